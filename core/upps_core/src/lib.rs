//! Validation and legacy conversion of UPPS persona profiles.
//!
//! A profile is loaded with [`load_profile`], optionally brought up to the
//! extended format with [`convert_profile`], then checked with
//! [`validate_profile`].

pub mod checks;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod registry;
pub mod schema;
pub mod stats;

pub use checks::{run_reference_checks, validate_profile, CheckSelection};
pub use config::{CognitiveTolerances, ValidatorConfig, VersionPolicy};
pub use convert::{
    convert_profile, has_pending_legacy, Conversion, ConversionReport, ConversionStep,
    StepOutcome,
};
pub use document::{extended_output_path, load_profile, save_profile, Profile};
pub use error::{UppsError, UppsResult};
pub use registry::{EmotionRegistry, MemoryIndex};
pub use schema::{SchemaLocator, SchemaValidator};
pub use stats::ProfileStats;
