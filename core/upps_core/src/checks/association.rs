use upps_types::{
    keys, AssociationSystem, CheckKind, CheckReport, EmotionSystem, Ident, MemorySystem,
    NodeKind, Trigger,
};

use super::read_section;
use crate::document::Profile;
use crate::registry::{EmotionRegistry, MemoryIndex};

/// Looks identifiers up in the namespace their `type` names.
struct Resolver<'a> {
    emotions: &'a EmotionRegistry,
    memories: &'a MemoryIndex,
}

impl Resolver<'_> {
    /// Returns the namespace label when `id` points into a namespace that
    /// does not declare it. External nodes and nodes without an id carry
    /// nothing to resolve.
    fn dangling(&self, kind: &NodeKind, id: Option<&Ident>) -> Option<&'static str> {
        let id = id?.as_str();
        match kind {
            NodeKind::Memory if !self.memories.contains(id) => Some("memory"),
            NodeKind::Emotion if !self.emotions.contains(id) => Some("emotion"),
            _ => None,
        }
    }
}

/// Every trigger, compound-trigger condition and response that points at a
/// memory or emotion must resolve.
pub fn check_association_references(profile: &Profile) -> CheckReport {
    let mut report = CheckReport::new(CheckKind::AssociationReferences);

    let Ok(system) =
        read_section::<AssociationSystem>(profile, keys::ASSOCIATION_SYSTEM, &mut report)
    else {
        return report.finish();
    };
    let Some(system) = system else {
        return report.skip("association_system not found; skipping association reference checks");
    };

    let Ok(emotion_system) =
        read_section::<EmotionSystem>(profile, keys::EMOTION_SYSTEM, &mut report)
    else {
        return report.finish();
    };
    let Ok(memory_system) = read_section::<MemorySystem>(profile, keys::MEMORY_SYSTEM, &mut report)
    else {
        return report.finish();
    };
    let emotions = emotion_system
        .as_ref()
        .map(EmotionRegistry::from_system)
        .unwrap_or_default();
    let memories = memory_system
        .as_ref()
        .map(MemoryIndex::from_system)
        .unwrap_or_default();
    let resolver = Resolver {
        emotions: &emotions,
        memories: &memories,
    };

    for (index, association) in system.associations.iter().enumerate() {
        let number = index + 1;
        let base = format!("association_system.associations[{}]", index);

        match &association.trigger {
            Some(Trigger::Simple(trigger)) => {
                if let Some(namespace) = resolver.dangling(&trigger.kind, trigger.id.as_ref()) {
                    report.error(
                        format!(
                            "association #{}: trigger references unknown {} id '{}'",
                            number,
                            namespace,
                            display_id(trigger.id.as_ref())
                        ),
                        format!("{}.trigger", base),
                    );
                }
            }
            Some(Trigger::Compound(compound)) => {
                for (cond_index, condition) in compound.conditions.iter().enumerate() {
                    // Conditions are simple triggers; nested compounds are not resolved.
                    let Trigger::Simple(condition) = condition else {
                        continue;
                    };
                    if let Some(namespace) =
                        resolver.dangling(&condition.kind, condition.id.as_ref())
                    {
                        report.error(
                            format!(
                                "association #{}, condition #{}: condition references unknown {} id '{}'",
                                number,
                                cond_index + 1,
                                namespace,
                                display_id(condition.id.as_ref())
                            ),
                            format!("{}.trigger.conditions[{}]", base, cond_index),
                        );
                    }
                }
            }
            Some(Trigger::Unrecognized(_)) | None => {}
        }

        if let Some(response) = &association.response {
            let namespace = response
                .kind
                .as_ref()
                .and_then(|kind| resolver.dangling(kind, response.id.as_ref()));
            if let Some(namespace) = namespace {
                report.error(
                    format!(
                        "association #{}: response references unknown {} id '{}'",
                        number,
                        namespace,
                        display_id(response.id.as_ref())
                    ),
                    format!("{}.response", base),
                );
            }
        }
    }

    report.finish()
}

fn display_id(id: Option<&Ident>) -> &str {
    id.map(Ident::as_str).unwrap_or_default()
}
