//! Game Configuration

use std::time::Duration;

use crate::error::{GameError, Result};

/// Tunables for a game session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Credits granted when the session starts
    pub initial_credits: u32,

    /// Credits granted by one completed checkout
    pub credits_per_purchase: u32,

    /// How long a toast stays visible
    pub toast_ttl: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_credits: 3,
            credits_per_purchase: 500,
            toast_ttl: Duration::from_secs(2),
        }
    }
}

impl GameConfig {
    /// Read overrides from `TAPSTAR_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let initial_credits =
            parse_or(&lookup, "TAPSTAR_INITIAL_CREDITS", defaults.initial_credits)?;
        let credits_per_purchase = parse_or(
            &lookup,
            "TAPSTAR_CREDITS_PER_PURCHASE",
            defaults.credits_per_purchase,
        )?;
        let toast_ttl = lookup("TAPSTAR_TOAST_TTL_MS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| {
                        GameError::Config(format!("TAPSTAR_TOAST_TTL_MS is not a number: {raw}"))
                    })
            })
            .transpose()?
            .unwrap_or(defaults.toast_ttl);

        Ok(Self {
            initial_credits,
            credits_per_purchase,
            toast_ttl,
        })
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u32) -> Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GameError::Config(format!("{key} is not a number: {raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = GameConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.toast_ttl, Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TAPSTAR_INITIAL_CREDITS", "10"),
            ("TAPSTAR_CREDITS_PER_PURCHASE", "50"),
            ("TAPSTAR_TOAST_TTL_MS", "750"),
        ]
        .into_iter()
        .collect();

        let config = GameConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.initial_credits, 10);
        assert_eq!(config.credits_per_purchase, 50);
        assert_eq!(config.toast_ttl, Duration::from_millis(750));
    }

    #[test]
    fn test_invalid_number() {
        let err = GameConfig::from_lookup(|k| {
            (k == "TAPSTAR_INITIAL_CREDITS").then(|| "three".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }
}
