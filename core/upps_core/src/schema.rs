//! Structural validation against the UPPS JSON schema.

use jsonschema::JSONSchema;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use upps_types::{CheckKind, CheckReport, Finding};

use crate::document::{load_yaml, Profile};
use crate::error::{UppsError, UppsResult};

/// Environment variable overriding the schema location.
pub const SCHEMA_ENV: &str = "UPPS_SCHEMA_PATH";

/// Relative locations probed under every search root, in order.
const SCHEMA_CANDIDATES: [&str; 3] = [
    "upps_schema.yaml",
    "schema/upps_schema.yaml",
    "specification/schema/upps_schema.yaml",
];

pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    pub fn compile(schema: &Value) -> UppsResult<Self> {
        let compiled = JSONSchema::options()
            .compile(schema)
            .map_err(|e| UppsError::SchemaCompile(e.to_string()))?;
        Ok(Self { compiled })
    }

    pub fn from_path(path: &Path) -> UppsResult<Self> {
        let schema = load_yaml(path)?;
        debug!(path = %path.display(), "schema loaded");
        Self::compile(&schema)
    }

    /// Validates a profile, describing the first violation on failure.
    pub fn validate(&self, profile: &Profile) -> Result<(), String> {
        let document = profile.to_value();
        let outcome = match self.compiled.validate(&document) {
            Ok(()) => Ok(()),
            Err(mut errors) => Err(errors
                .next()
                .map(|e| format!("{} at {}", e, e.instance_path))
                .unwrap_or_else(|| "profile does not match the schema".to_string())),
        };
        outcome
    }

    pub fn check(&self, profile: &Profile) -> CheckReport {
        let mut report = CheckReport::new(CheckKind::Schema);
        if let Err(violation) = self.validate(profile) {
            report.push(Finding::error(violation));
        }
        report.finish()
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

/// Finds the schema file: explicit path first, then the environment
/// override, then the well-known relative locations under each search root.
#[derive(Debug, Clone, Default)]
pub struct SchemaLocator {
    explicit: Option<PathBuf>,
    from_env: Option<PathBuf>,
    search_roots: Vec<PathBuf>,
}

impl SchemaLocator {
    /// Locator seeded from `UPPS_SCHEMA_PATH` and the default search roots.
    pub fn from_environment(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            from_env: env::var_os(SCHEMA_ENV).map(PathBuf::from),
            search_roots: default_search_roots(),
        }
    }

    pub fn new(explicit: Option<PathBuf>, from_env: Option<PathBuf>, search_roots: Vec<PathBuf>) -> Self {
        Self {
            explicit,
            from_env,
            search_roots,
        }
    }

    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .explicit
            .iter()
            .chain(self.from_env.iter())
            .cloned()
            .collect();
        for root in &self.search_roots {
            for relative in SCHEMA_CANDIDATES {
                paths.push(root.join(relative));
            }
        }
        paths
    }

    pub fn locate(&self) -> UppsResult<PathBuf> {
        let candidates = self.candidates();
        match candidates.iter().find(|path| path.is_file()) {
            Some(found) => {
                debug!(path = %found.display(), "schema located");
                Ok(found.clone())
            }
            None => Err(UppsError::SchemaNotFound {
                searched: candidates,
            }),
        }
    }
}

/// Current directory, then the executable's directory and its two parents.
pub fn default_search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.extend(exe_dir.ancestors().take(3).map(Path::to_path_buf));
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["personal_info"],
            "properties": {
                "personal_info": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {"name": {"type": "string", "minLength": 1}}
                },
                "memory_system": {
                    "type": "object",
                    "properties": {
                        "memories": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": {"enum": ["episodic", "semantic", "procedural", "autobiographical"]}
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    fn profile(value: Value) -> Profile {
        Profile::from_value(value, "test").expect("mapping root")
    }

    #[test]
    fn valid_profile_passes() {
        let validator = SchemaValidator::compile(&schema()).expect("valid schema");
        let report = validator.check(&profile(json!({"personal_info": {"name": "Aoi"}})));
        assert!(report.passed);
    }

    #[test]
    fn violation_describes_location() {
        let validator = SchemaValidator::compile(&schema()).expect("valid schema");
        let result = validator.validate(&profile(json!({
            "personal_info": {"name": "Aoi"},
            "memory_system": {"memories": [{"type": "dream"}]}
        })));
        let message = result.unwrap_err();
        assert!(message.contains("/memory_system/memories/0/type"), "{}", message);

        let report = validator.check(&profile(json!({"memory_system": {}})));
        assert!(!report.passed);
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn invalid_schema_fails_to_compile() {
        let err = SchemaValidator::compile(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, UppsError::SchemaCompile(_)));
    }

    #[test]
    fn locator_prefers_explicit_then_env_then_roots() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("schema");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("upps_schema.yaml"), "type: object\n").expect("write");

        let locator = SchemaLocator::new(None, None, vec![dir.path().to_path_buf()]);
        assert_eq!(
            locator.locate().expect("found under root"),
            nested.join("upps_schema.yaml")
        );

        let override_path = dir.path().join("custom.yaml");
        fs::write(&override_path, "type: object\n").expect("write");
        let locator = SchemaLocator::new(
            None,
            Some(override_path.clone()),
            vec![dir.path().to_path_buf()],
        );
        assert_eq!(locator.locate().expect("env override"), override_path);

        let explicit = dir.path().join("explicit.yaml");
        fs::write(&explicit, "type: object\n").expect("write");
        let locator = SchemaLocator::new(
            Some(explicit.clone()),
            Some(override_path),
            vec![dir.path().to_path_buf()],
        );
        assert_eq!(locator.locate().expect("explicit"), explicit);
    }

    #[test]
    fn missing_schema_lists_every_candidate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let locator = SchemaLocator::new(None, None, vec![dir.path().to_path_buf()]);
        match locator.locate() {
            Err(UppsError::SchemaNotFound { searched }) => assert_eq!(searched.len(), 3),
            other => panic!("expected SchemaNotFound, got {:?}", other),
        }
    }

    #[test]
    fn schema_loads_from_yaml_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("upps_schema.yaml");
        fs::write(&path, "type: object\nrequired: [personal_info]\n").expect("write");
        let validator = SchemaValidator::from_path(&path).expect("compiles");
        assert!(validator.validate(&profile(json!({}))).is_err());
    }
}
