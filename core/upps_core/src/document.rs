//! Loading and saving profile documents.
//!
//! Documents are YAML on disk and an order-preserving JSON tree in memory, so
//! the same value can be handed to the schema validator and written back
//! without shuffling the author's keys.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{UppsError, UppsResult};

/// Suffix inserted before the extension of a converted profile's file name.
pub const EXTENDED_SUFFIX: &str = "_extended";

/// One persona profile: a mapping of named sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    root: Map<String, Value>,
}

impl Profile {
    pub fn from_value(value: Value, origin: &str) -> UppsResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(UppsError::NotAMapping {
                origin: origin.to_string(),
            }),
        }
    }

    pub fn from_yaml_str(source: &str, origin: &str) -> UppsResult<Self> {
        let value = parse_yaml(source, origin)?;
        Self::from_value(value, origin)
    }

    pub fn to_yaml_string(&self) -> UppsResult<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Looks up a nested value by JSON pointer, e.g. `/personal_info/name`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        match rest.split_once('/') {
            Some((head, tail)) => self.root.get(head)?.pointer(&format!("/{}", tail)),
            None => self.root.get(rest),
        }
    }

    /// Reads a section as its typed form.
    ///
    /// Returns `Ok(None)` when the section is absent and an error when it is
    /// present but does not have the expected shape.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> UppsResult<Option<T>> {
        match self.root.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| UppsError::Section {
                    key: key.to_string(),
                    source,
                }),
        }
    }

    /// Returns a copy of the profile with `key` set to `section`.
    ///
    /// New keys are appended after the existing ones.
    pub fn with_section<T: Serialize>(mut self, key: &str, section: &T) -> UppsResult<Self> {
        let value = serde_json::to_value(section).map_err(|source| UppsError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.root.insert(key.to_string(), value);
        Ok(self)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

/// Parses YAML text into a JSON value tree.
pub fn parse_yaml(source: &str, origin: &str) -> UppsResult<Value> {
    serde_yaml::from_str(source).map_err(|source| UppsError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Reads a YAML file into a JSON value tree.
pub fn load_yaml(path: &Path) -> UppsResult<Value> {
    let content = fs::read_to_string(path).map_err(|source| UppsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml(&content, &path.display().to_string())
}

pub fn load_profile(path: &Path) -> UppsResult<Profile> {
    let value = load_yaml(path)?;
    let profile = Profile::from_value(value, &path.display().to_string())?;
    debug!(path = %path.display(), sections = profile.root.len(), "profile loaded");
    Ok(profile)
}

pub fn save_profile(path: &Path, profile: &Profile) -> UppsResult<()> {
    let yaml = profile.to_yaml_string()?;
    fs::write(path, yaml).map_err(|source| UppsError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "profile written");
    Ok(())
}

/// Path the converter writes to: `<stem>_extended.<ext>` beside the input,
/// or `<name>_extended.yaml` when the input has no extension.
pub fn extended_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profile".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "yaml".to_string());
    input.with_file_name(format!("{}{}.{}", stem, EXTENDED_SUFFIX, extension))
}
