use std::num::NonZeroU16;
use std::sync::{Arc, RwLock};

/// Shown until the gateway reports ready
pub const PLACEHOLDER_NAME: &str = "Loading...";

/// The bot's display name, written on ready and read by the health thread
#[derive(Debug, Clone)]
pub struct BotName(Arc<RwLock<String>>);

impl Default for BotName {
    fn default() -> Self {
        Self(Arc::new(RwLock::new(PLACEHOLDER_NAME.to_string())))
    }
}

impl BotName {
    pub fn get(&self) -> String {
        match self.0.read() {
            Ok(name) => name.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, name: impl Into<String>) {
        let name = name.into();
        match self.0.write() {
            Ok(mut slot) => *slot = name,
            Err(poisoned) => *poisoned.into_inner() = name,
        }
    }
}

/// `name#discriminator`, with `0` for accounts on the new username system
pub fn display_tag(name: &str, discriminator: Option<NonZeroU16>) -> String {
    format!("{}#{}", name, discriminator.map_or(0, NonZeroU16::get))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_until_set() {
        let name = BotName::default();
        assert_eq!(name.get(), "Loading...");

        let shared = name.clone();
        shared.set("ExampleBot#0");
        assert_eq!(name.get(), "ExampleBot#0");
    }

    #[test]
    fn test_visible_across_threads() {
        let name = BotName::default();
        let writer = name.clone();
        std::thread::spawn(move || writer.set("ExampleBot#0"))
            .join()
            .unwrap();
        assert_eq!(name.get(), "ExampleBot#0");
    }

    #[test]
    fn test_display_tag() {
        assert_eq!(display_tag("ExampleBot", None), "ExampleBot#0");
        assert_eq!(display_tag("Legacy", NonZeroU16::new(1234)), "Legacy#1234");
    }
}
