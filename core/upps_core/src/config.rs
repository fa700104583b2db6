use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{UppsError, UppsResult};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "UPPS_CONFIG";

/// Profile version the reference checks expect by default.
pub const EXPECTED_PROFILE_VERSION: &str = "2025.3 v1.0.0";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ValidatorConfig {
    pub cognitive: CognitiveTolerances,
    pub version: VersionPolicy,
    pub schema: SchemaSettings,
}

/// Distances between `general_ability.level` and the individual abilities
/// beyond which an advisory finding is raised.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CognitiveTolerances {
    /// Largest allowed gap to any single ability level.
    pub ability_gap_tolerance: f64,
    /// Largest allowed gap to the mean of the four ability levels.
    pub mean_gap_tolerance: f64,
}

impl Default for CognitiveTolerances {
    fn default() -> Self {
        Self {
            ability_gap_tolerance: 30.0,
            mean_gap_tolerance: 20.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VersionPolicy {
    pub enforce: bool,
    pub expected: String,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            enforce: true,
            expected: EXPECTED_PROFILE_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SchemaSettings {
    pub path: Option<PathBuf>,
}

impl ValidatorConfig {
    /// Parses TOML after replacing `{{VAR_NAME}}` placeholders with the
    /// matching environment variables. Unknown variables are left as written.
    pub fn from_toml_str(content: &str) -> UppsResult<Self> {
        let re = Regex::new(r"\{\{([a-zA-Z0-9_]+)\}\}")
            .map_err(|e| UppsError::Config(format!("failed to create placeholder regex: {}", e)))?;

        let processed = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("{{{{{}}}}}", var_name))
        });

        toml::from_str(&processed)
            .map_err(|e| UppsError::Config(format!("failed to parse config: {}", e)))
    }

    pub fn load(path: &Path) -> UppsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            UppsError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Loads the explicit file, else the one named by `UPPS_CONFIG`, else
    /// falls back to defaults.
    pub fn resolve(explicit: Option<&Path>) -> UppsResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ValidatorConfig::from_toml_str("").expect("empty toml is valid");
        assert_eq!(config, ValidatorConfig::default());
        assert_eq!(config.cognitive.ability_gap_tolerance, 30.0);
        assert_eq!(config.cognitive.mean_gap_tolerance, 20.0);
        assert!(config.version.enforce);
        assert_eq!(config.version.expected, EXPECTED_PROFILE_VERSION);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = ValidatorConfig::from_toml_str(
            "[cognitive]\nmean_gap_tolerance = 12.5\n\n[version]\nenforce = false\n",
        )
        .expect("valid toml");
        assert_eq!(config.cognitive.ability_gap_tolerance, 30.0);
        assert_eq!(config.cognitive.mean_gap_tolerance, 12.5);
        assert!(!config.version.enforce);
        assert_eq!(config.version.expected, EXPECTED_PROFILE_VERSION);
    }

    #[test]
    fn placeholders_are_filled_from_environment() {
        env::set_var("UPPS_TEST_SCHEMA_DIR", "/opt/upps");
        let config = ValidatorConfig::from_toml_str(
            "[schema]\npath = \"{{UPPS_TEST_SCHEMA_DIR}}/upps_schema.yaml\"\n",
        )
        .expect("valid toml");
        assert_eq!(
            config.schema.path,
            Some(PathBuf::from("/opt/upps/upps_schema.yaml"))
        );
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let config = ValidatorConfig::from_toml_str(
            "[version]\nexpected = \"{{UPPS_TEST_UNSET_VARIABLE}}\"\n",
        )
        .expect("valid toml");
        assert_eq!(config.version.expected, "{{UPPS_TEST_UNSET_VARIABLE}}");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = ValidatorConfig::from_toml_str("[cognitive\n").unwrap_err();
        assert!(matches!(err, UppsError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[cognitive]\nability_gap_tolerance = 25.0").expect("write");
        let config = ValidatorConfig::resolve(Some(file.path())).expect("loadable");
        assert_eq!(config.cognitive.ability_gap_tolerance, 25.0);
    }
}
