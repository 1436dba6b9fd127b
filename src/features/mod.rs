pub mod command_sync;
pub mod health;
pub mod presence;
