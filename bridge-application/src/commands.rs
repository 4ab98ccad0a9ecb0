pub mod event_commands;
pub mod refresh_commands;
