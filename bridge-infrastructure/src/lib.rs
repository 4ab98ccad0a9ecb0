pub mod config;
pub mod gateway;
pub mod mqtt;

pub use config::*;
pub use gateway::*;
pub use mqtt::*;
