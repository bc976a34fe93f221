//! Configuration management for the mock store
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (mocks.toml)
//! - Environment variables (MOCKS__*)
//!
//! ## Example config file (mocks.toml):
//! ```toml
//! [generation]
//! seed = 42
//! list_length_min = 1
//! list_length_max = 10
//! root_key = "ROOT"
//!
//! [key_fields]
//! preference = ["id", "_id"]
//!
//! [[type_policies]]
//! type_name = "Session"
//! key_field = "token"
//!
//! [[type_policies]]
//! type_name = "LogLine"
//! key_field = false
//! ```

use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{MockError, Result};

/// Main configuration for a mock store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MockConfig {
    /// Value generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Key field inference
    #[serde(default)]
    pub key_fields: KeyFieldConfig,

    /// Per-type policies
    #[serde(default)]
    pub type_policies: Vec<TypePolicy>,
}

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Seed for the store RNG. Unseeded stores draw from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Shortest generated list (inclusive)
    #[serde(default = "default_list_length_min")]
    pub list_length_min: usize,

    /// Longest generated list (inclusive)
    #[serde(default = "default_list_length_max")]
    pub list_length_max: usize,

    /// Identity used for the root read and write types
    #[serde(default = "default_root_key")]
    pub root_key: String,
}

/// Which field names are inferred as key fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFieldConfig {
    /// Checked in order; the first one declared on the type wins
    #[serde(default = "default_key_preference")]
    pub preference: Vec<String>,
}

/// Policy for a single type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePolicy {
    pub type_name: String,

    #[serde(default)]
    pub key_field: KeyFieldPolicy,
}

impl TypePolicy {
    pub fn new(type_name: impl Into<String>, key_field: KeyFieldPolicy) -> Self {
        Self {
            type_name: type_name.into(),
            key_field,
        }
    }
}

/// How a type's key field is chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "KeyFieldSetting", into = "KeyFieldSetting")]
pub enum KeyFieldPolicy {
    /// First field from the preference list declared on the type
    #[default]
    Infer,
    /// This exact field
    Field(String),
    /// No key field; identities are always generated
    Disabled,
}

/// On-disk spelling: `key_field = "token"`, `key_field = false` or `true`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum KeyFieldSetting {
    Enabled(bool),
    Field(String),
}

impl From<KeyFieldSetting> for KeyFieldPolicy {
    fn from(setting: KeyFieldSetting) -> Self {
        match setting {
            KeyFieldSetting::Enabled(true) => KeyFieldPolicy::Infer,
            KeyFieldSetting::Enabled(false) => KeyFieldPolicy::Disabled,
            KeyFieldSetting::Field(name) => KeyFieldPolicy::Field(name),
        }
    }
}

impl From<KeyFieldPolicy> for KeyFieldSetting {
    fn from(policy: KeyFieldPolicy) -> Self {
        match policy {
            KeyFieldPolicy::Infer => KeyFieldSetting::Enabled(true),
            KeyFieldPolicy::Disabled => KeyFieldSetting::Enabled(false),
            KeyFieldPolicy::Field(name) => KeyFieldSetting::Field(name),
        }
    }
}

// Default value functions
fn default_list_length_min() -> usize {
    1
}

fn default_list_length_max() -> usize {
    10
}

fn default_root_key() -> String {
    "ROOT".to_string()
}

fn default_key_preference() -> Vec<String> {
    vec!["id".to_string(), "_id".to_string()]
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            list_length_min: default_list_length_min(),
            list_length_max: default_list_length_max(),
            root_key: default_root_key(),
        }
    }
}

impl Default for KeyFieldConfig {
    fn default() -> Self {
        Self {
            preference: default_key_preference(),
        }
    }
}

impl MockConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["mocks.toml", ".mocks.toml", "config/mocks.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "mocks") {
            let xdg_config = config_dir.config_dir().join("mocks.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Environment variables (MOCKS__GENERATION__SEED=7)
        builder = builder.add_source(
            Environment::with_prefix("MOCKS")
                .separator("__")
                .try_parsing(true),
        );

        let config: MockConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MockConfig = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Reject settings the store cannot honor
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if generation.list_length_min > generation.list_length_max {
            return Err(MockError::InvalidConfig(format!(
                "list_length_min ({}) is greater than list_length_max ({})",
                generation.list_length_min, generation.list_length_max
            )));
        }
        if generation.root_key.is_empty() {
            return Err(MockError::InvalidConfig("root_key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Builder: fix the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generation.seed = Some(seed);
        self
    }

    /// Builder: add a type policy, replacing any earlier one for the same type
    pub fn with_type_policy(mut self, policy: TypePolicy) -> Self {
        self.type_policies.retain(|p| p.type_name != policy.type_name);
        self.type_policies.push(policy);
        self
    }

    /// Type policies indexed by type name
    pub fn policies_by_type(&self) -> HashMap<String, KeyFieldPolicy> {
        self.type_policies
            .iter()
            .map(|p| (p.type_name.clone(), p.key_field.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;

    /// Serializes tests that read or write `MOCKS__*` variables
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    /// Environment variable removed again when dropped
    struct ScopedEnv(&'static str);

    impl ScopedEnv {
        fn set(name: &'static str, value: &str) -> Self {
            std::env::set_var(name, value);
            Self(name)
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            std::env::remove_var(self.0);
        }
    }

    #[test]
    fn test_default_config() {
        let config = MockConfig::default();
        assert_eq!(config.generation.list_length_min, 1);
        assert_eq!(config.generation.list_length_max, 10);
        assert_eq!(config.generation.root_key, "ROOT");
        assert_eq!(config.key_fields.preference, vec!["id", "_id"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_config() {
        let config = MockConfig::default()
            .with_type_policy(TypePolicy::new("LogLine", KeyFieldPolicy::Disabled));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[generation]"));
        assert!(toml_str.contains("[key_fields]"));
        assert!(toml_str.contains("key_field = false"));
    }

    #[test]
    fn test_parse_type_policies() {
        let config = MockConfig::from_toml_str(
            r#"
            [generation]
            seed = 7
            list_length_max = 3

            [[type_policies]]
            type_name = "Session"
            key_field = "token"

            [[type_policies]]
            type_name = "LogLine"
            key_field = false
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.seed, Some(7));
        assert_eq!(config.generation.list_length_max, 3);
        let policies = config.policies_by_type();
        assert_eq!(policies["Session"], KeyFieldPolicy::Field("token".to_string()));
        assert_eq!(policies["LogLine"], KeyFieldPolicy::Disabled);
    }

    #[test]
    fn test_invalid_list_bounds() {
        let result = MockConfig::from_toml_str(
            "[generation]\nlist_length_min = 5\nlist_length_max = 2\n",
        );
        assert!(matches!(result, Err(MockError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[generation]\nroot_key = \"__root\"").unwrap();

        let config = MockConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.generation.root_key, "__root");
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[generation]\nroot_key = \"from_file\"\nlist_length_max = 4\n").unwrap();

        let _root_key = ScopedEnv::set("MOCKS__GENERATION__ROOT_KEY", "from_env");
        let _seed = ScopedEnv::set("MOCKS__GENERATION__SEED", "21");

        let config = MockConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.generation.root_key, "from_env");
        assert_eq!(config.generation.seed, Some(21));
        // keys the environment does not mention keep the file value
        assert_eq!(config.generation.list_length_max, 4);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let config = MockConfig::default()
            .with_seed(99)
            .with_type_policy(TypePolicy::new("Session", KeyFieldPolicy::Field("token".into())));
        config.save(path.to_str().unwrap()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let reloaded = MockConfig::from_toml_str(&content).unwrap();
        assert_eq!(reloaded, config);
    }
}
