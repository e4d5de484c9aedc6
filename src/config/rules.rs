use crate::config::substitute_env_vars;
use crate::domain::rule::RuleSet;
use crate::utils::error::{AssignerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Contents of the rules configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// User login mapped to a newline-delimited block of `<field>:<pattern>` lines.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
    pub fallback: Option<FallbackConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub label: String,
}

impl RulesConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssignerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| AssignerError::config(format!("rules file is not valid TOML: {}", e)))
    }

    /// Parses every rule block and compiles its patterns.
    pub fn into_rule_set(self) -> Result<RuleSet> {
        let fallback_label = match self.fallback {
            Some(fallback) if fallback.label.trim().is_empty() => {
                return Err(AssignerError::config("fallback.label cannot be empty"));
            }
            Some(fallback) => Some(fallback.label),
            None => None,
        };

        RuleSet::from_blocks(
            self.patterns
                .iter()
                .map(|(user, block)| (user.as_str(), block.as_str())),
            fallback_label,
        )
    }
}

/// Loads and compiles a rules file in one step.
pub fn load_rule_set<P: AsRef<Path>>(path: P) -> Result<RuleSet> {
    RulesConfig::from_file(path)?.into_rule_set()
}
