// Domain entities

pub mod channel;
pub mod config;
pub mod device;
pub mod event;
pub mod message;

pub use channel::*;
pub use config::*;
pub use device::*;
pub use event::*;
pub use message::*;
