// Gateway and Publisher Port Traits (Interfaces)
// Define what the domain needs from infrastructure

pub mod gateway;
pub mod publisher;

pub use gateway::*;
pub use publisher::*;
