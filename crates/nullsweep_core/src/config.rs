//! Analyzer configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::{CoreError, Severity};

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// File names searched by [`AnalyzerConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".nullsweep.jsonc", ".nullsweep.json"];

/// Configuration for the analysis driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Rule settings keyed by rule id.
    #[serde(default)]
    pub rules: HashMap<String, RuleSetting>,

    /// Whether generated files are analyzed.
    #[serde(default)]
    pub analyze_generated_code: bool,

    /// Glob patterns identifying generated files.
    #[serde(default = "default_generated_code_patterns")]
    pub generated_code_patterns: Vec<String>,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_generated_code_patterns() -> Vec<String> {
    ["**/*.g.cs", "**/*.designer.cs", "**/*.generated.cs"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Setting for a single rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RuleSetting {
    /// Rule is enabled/disabled (boolean).
    Enabled(bool),
    /// Rule severity, or `off`.
    Level(RuleLevel),
}

/// Severity names accepted in configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warning,
    Info,
    Off,
}

impl RuleSetting {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleSetting::Enabled(enabled) => *enabled,
            RuleSetting::Level(level) => *level != RuleLevel::Off,
        }
    }

    /// Severity override, if the setting names one.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RuleSetting::Level(RuleLevel::Error) => Some(Severity::Error),
            RuleSetting::Level(RuleLevel::Warning) => Some(Severity::Warning),
            RuleSetting::Level(RuleLevel::Info) => Some(Severity::Info),
            RuleSetting::Level(RuleLevel::Off) | RuleSetting::Enabled(_) => None,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a configuration with every rule at its default.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
            analyze_generated_code: false,
            generated_code_patterns: default_generated_code_patterns(),
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.nullsweep.jsonc`, `.nullsweep.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CoreError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Looks for a configuration file in `dir` and loads the first one found.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, CoreError> {
        let dir = dir.as_ref();
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .map(Self::from_file)
            .transpose()
    }

    /// Parses configuration from a JSON or JSONC string with schema
    /// validation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        // Parse into Value first for validation
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| CoreError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        // Initialize and check schema
        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(CoreError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| CoreError::config(format!("Invalid config: {}", e)))
    }

    /// Returns whether `rule_id` is enabled, falling back to
    /// `enabled_by_default` when the rule is not configured.
    pub fn is_rule_enabled(&self, rule_id: &str, enabled_by_default: bool) -> bool {
        self.rules
            .get(rule_id)
            .map_or(enabled_by_default, RuleSetting::is_enabled)
    }

    /// Effective severity of `rule_id`, or `None` when the rule is disabled.
    pub fn rule_severity(&self, rule_id: &str, default: Severity) -> Option<Severity> {
        match self.rules.get(rule_id) {
            Some(setting) if !setting.is_enabled() => None,
            Some(setting) => Some(setting.severity().unwrap_or(default)),
            None => Some(default),
        }
    }

    /// Computes a hash of the configuration.
    pub fn hash(&self) -> String {
        // Sort rules so that map order does not affect the hash
        let mut rules: Vec<_> = self.rules.iter().collect();
        rules.sort_by(|a, b| a.0.cmp(b.0));
        let normalized = serde_json::json!({
            "rules": rules,
            "analyzeGeneratedCode": self.analyze_generated_code,
            "generatedCodePatterns": self.generated_code_patterns,
        });
        let json = serde_json::to_string(&normalized).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}
