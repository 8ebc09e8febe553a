use log::warn;
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_derive::Deserialize;
use std::sync::Mutex;

static INSTANCE: OnceCell<Mutex<RuntimeConfig>> = OnceCell::new();

pub fn instance() -> &'static Mutex<RuntimeConfig> {
    INSTANCE.get_or_init(|| Mutex::new(RuntimeConfig::new()))
}

/// Runtime defaults applied to newly opened fights.
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    pub default_min_wager: Decimal,
    pub default_max_wager: Decimal,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        RuntimeConfig {
            default_min_wager: dec!(1),
            default_max_wager: dec!(1000000),
        }
    }

    pub fn from_toml(path: &str) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file, {:?}",
                    e
                );
                return Some(RuntimeConfig::new());
            }
        };
        let config: RuntimeConfig = match toml::from_str(&contents) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file, {:?}",
                    e
                );
                return Some(RuntimeConfig::new());
            }
        };
        {
            let mut current = instance().lock().unwrap();
            current.default_min_wager = config.default_min_wager;
            current.default_max_wager = config.default_max_wager;
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = RuntimeConfig::from_toml("no-such-config.toml").unwrap();
        assert_eq!(config.default_min_wager, dec!(1));
        assert_eq!(config.default_max_wager, dec!(1000000));
    }
}
