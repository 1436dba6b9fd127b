// Utility functions module
pub mod bot_name;
pub mod config;
pub mod store;
