use anyhow::{Context, Result};

use crate::screening::ranker::{RankingOptions, DEFAULT_MAX_DOCUMENTS};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_documents: usize,
    pub max_upload_bytes: usize,
    pub drop_empty_normalized: bool,
    pub include_skills: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_documents: DEFAULT_MAX_DOCUMENTS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            drop_empty_normalized: false,
            include_skills: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let max_documents = parse_or(&lookup, "MAX_DOCUMENTS", defaults.max_documents)?;
        if max_documents == 0 {
            anyhow::bail!("MAX_DOCUMENTS must be at least 1");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_documents,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            drop_empty_normalized: parse_or(
                &lookup,
                "DROP_EMPTY_NORMALIZED",
                defaults.drop_empty_normalized,
            )?,
            include_skills: parse_or(&lookup, "INCLUDE_SKILLS", defaults.include_skills)?,
        })
    }

    pub fn ranking_options(&self) -> RankingOptions {
        RankingOptions {
            max_documents: self.max_documents,
            drop_empty_normalized: self.drop_empty_normalized,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_documents, 10);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(!config.drop_empty_normalized);
        assert!(config.include_skills);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("MAX_DOCUMENTS", "5"),
            ("DROP_EMPTY_NORMALIZED", "true"),
            ("INCLUDE_SKILLS", "false"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.ranking_options().max_documents, 5);
        assert!(config.ranking_options().drop_empty_normalized);
        assert!(!config.include_skills);
    }

    #[test]
    fn test_invalid_port_fails() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }

    #[test]
    fn test_zero_cap_fails() {
        assert!(config_from(&[("MAX_DOCUMENTS", "0")]).is_err());
    }
}
