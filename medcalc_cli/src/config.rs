//! Runtime configuration resolved once at startup from the environment
//! (after `.env` has been loaded).

use std::path::PathBuf;

/// Default preferences file, relative to the working directory
pub const DEFAULT_PREFS_PATH: &str = "medcalc-prefs.json";

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// `MEDCALC_PREFS`
    pub prefs_path: PathBuf,
    /// `API_KEY`, falling back to `GEMINI_API_KEY`
    pub api_key: Option<String>,
    /// `MEDCALC_MODEL`, overrides the model stored in preferences
    pub model_override: Option<String>,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        CliConfig {
            prefs_path: non_empty("MEDCALC_PREFS")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH)),
            api_key: non_empty("API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            model_override: non_empty("MEDCALC_MODEL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.prefs_path, PathBuf::from(DEFAULT_PREFS_PATH));
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.model_override, None);
    }

    #[test]
    fn test_api_key_precedence() {
        assert_eq!(config(&[("GEMINI_API_KEY", "g")]).api_key.as_deref(), Some("g"));
        assert_eq!(
            config(&[("API_KEY", "a"), ("GEMINI_API_KEY", "g")]).api_key.as_deref(),
            Some("a")
        );
        assert_eq!(
            config(&[("API_KEY", " "), ("GEMINI_API_KEY", "g")]).api_key.as_deref(),
            Some("g")
        );
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[("MEDCALC_PREFS", "/tmp/p.json"), ("MEDCALC_MODEL", "gemini-pro")]);
        assert_eq!(cfg.prefs_path, PathBuf::from("/tmp/p.json"));
        assert_eq!(cfg.model_override.as_deref(), Some("gemini-pro"));
    }
}
