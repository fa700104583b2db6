use serde_json::Value;
use upps_types::{CheckKind, CheckReport};

use crate::config::VersionPolicy;
use crate::document::Profile;

const VERSION_POINTER: &str = "/non_dialogue_metadata/administrative/version";
const VERSION_LOCATOR: &str = "non_dialogue_metadata.administrative.version";

pub fn check_version(profile: &Profile, policy: &VersionPolicy) -> CheckReport {
    let mut report = CheckReport::new(CheckKind::Version);
    if !policy.enforce {
        return report.skip("version enforcement disabled; skipping version check");
    }

    match profile.pointer(VERSION_POINTER) {
        None | Some(Value::Null) => report.error(
            format!("profile version is missing; expected '{}'", policy.expected),
            VERSION_LOCATOR,
        ),
        Some(Value::String(found)) if *found == policy.expected => {}
        Some(other) => {
            let found = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
            report.error(
                format!(
                    "profile version '{}' does not match expected '{}'",
                    found, policy.expected
                ),
                VERSION_LOCATOR,
            );
        }
    }

    report.finish()
}
