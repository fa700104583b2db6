use std::collections::BTreeMap;
use upps_types::{keys, CheckKind, CheckReport, MemorySystem};

use super::read_section;
use crate::document::Profile;

/// Memory ids must be unique among the records that carry one.
pub fn check_memory_references(profile: &Profile) -> CheckReport {
    let mut report = CheckReport::new(CheckKind::MemoryReferences);

    let Ok(system) = read_section::<MemorySystem>(profile, keys::MEMORY_SYSTEM, &mut report) else {
        return report.finish();
    };
    let Some(system) = system else {
        return report.skip("memory_system not found; skipping memory reference checks");
    };

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in system.memories.iter().filter_map(|m| m.id_str()) {
        *counts.entry(id).or_default() += 1;
    }

    for (id, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
        report.error(
            format!("memory id '{}' is defined {} times", id, count),
            format!("memory_system.memories[id={}]", id),
        );
    }

    report.finish()
}
