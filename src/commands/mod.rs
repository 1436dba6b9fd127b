// Slash and prefix commands
pub mod info_channels;
pub mod setup;
