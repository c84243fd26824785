use regex::Regex;
use tracing::{debug, warn};

use crate::error::IamError;
use crate::model::{ID_PLACEHOLDER, ResourceRef, ResourceType};

/// Resource types in registration order, each with a compiled reverse matcher.
///
/// Reverse lookup walks the types in registration order and the first match
/// wins. Overlapping patterns are allowed but reported by [`overlaps`]
/// and logged at construction.
///
/// [`overlaps`]: ResourceRegistry::overlaps
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    resource_type: ResourceType,
    matcher: Regex,
}

/// Two registered types whose patterns can match the same URN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternOverlap {
    /// Registered first; wins reverse lookups.
    pub winner: String,
    pub shadowed: String,
}

impl ResourceRegistry {
    /// Build the registry. Every pattern must contain exactly one `{id}`.
    pub fn new(types: Vec<ResourceType>) -> Result<Self, IamError> {
        let mut entries = Vec::with_capacity(types.len());
        for resource_type in types {
            if entries
                .iter()
                .any(|e: &Entry| e.resource_type.id == resource_type.id)
            {
                return Err(IamError::InvalidUrnPattern {
                    type_id: resource_type.id,
                    reason: "resource type registered twice".into(),
                });
            }
            let matcher = compile_matcher(&resource_type)?;
            entries.push(Entry {
                resource_type,
                matcher,
            });
        }

        let registry = Self { entries };
        for overlap in registry.overlaps() {
            warn!(
                winner = %overlap.winner,
                shadowed = %overlap.shadowed,
                "overlapping URN patterns, registration order decides"
            );
        }
        Ok(registry)
    }

    /// Registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &ResourceType> {
        self.entries.iter().map(|e| &e.resource_type)
    }

    pub fn get(&self, type_id: &str) -> Option<&ResourceType> {
        self.types().find(|t| t.id == type_id)
    }

    /// Substitute `identifier` (which may be `*`) into the type's pattern.
    pub fn resolve(&self, type_id: &str, identifier: &str) -> Result<String, IamError> {
        let resource_type = self
            .get(type_id)
            .ok_or_else(|| IamError::UnknownResourceType(type_id.to_string()))?;
        Ok(resource_type.urn_pattern.replace(ID_PLACEHOLDER, identifier))
    }

    /// First registered type whose pattern matches `urn`.
    pub fn reverse_match(&self, urn: &str) -> Option<&ResourceType> {
        self.entries
            .iter()
            .find(|e| e.matcher.is_match(urn))
            .map(|e| &e.resource_type)
    }

    /// Break a URN into its type and trailing identifier segment.
    pub fn describe<'a>(&'a self, urn: &'a str) -> Option<ResourceRef<'a>> {
        let resource_type = self.reverse_match(urn)?;
        let identifier = urn.rsplit('/').next().unwrap_or(urn);
        Some(ResourceRef {
            resource_type,
            identifier,
        })
    }

    /// Human label for a URN. Never fails; unknown URNs come back unchanged.
    pub fn label(&self, urn: &str) -> String {
        if urn == "*" {
            return "All Resources".to_string();
        }
        match self.describe(urn) {
            Some(r) if r.is_wildcard() => format!("All {}s", r.resource_type.label),
            Some(r) => format!("{}: {}", r.resource_type.label, r.identifier),
            None => {
                debug!(urn, "no resource type matches URN");
                urn.to_string()
            }
        }
    }

    /// Every pair of types where a wildcard URN of the later type is also
    /// matched by the earlier one (or vice versa), so reverse lookups of one
    /// type can land on the other.
    pub fn overlaps(&self) -> Vec<PatternOverlap> {
        let mut found = Vec::new();
        for (i, first) in self.entries.iter().enumerate() {
            for second in &self.entries[i + 1..] {
                let second_urn = second.resource_type.urn_pattern.replace(ID_PLACEHOLDER, "*");
                let first_urn = first.resource_type.urn_pattern.replace(ID_PLACEHOLDER, "*");
                if first.matcher.is_match(&second_urn) || second.matcher.is_match(&first_urn) {
                    found.push(PatternOverlap {
                        winner: first.resource_type.id.clone(),
                        shadowed: second.resource_type.id.clone(),
                    });
                }
            }
        }
        found
    }
}

/// Literal-escape the template and turn `{id}` into a match-anything group.
fn compile_matcher(resource_type: &ResourceType) -> Result<Regex, IamError> {
    let invalid = |reason: &str| IamError::InvalidUrnPattern {
        type_id: resource_type.id.clone(),
        reason: reason.to_string(),
    };

    let pattern = &resource_type.urn_pattern;
    let Some((prefix, suffix)) = pattern.split_once(ID_PLACEHOLDER) else {
        return Err(invalid("pattern has no {id} placeholder"));
    };
    if suffix.contains(ID_PLACEHOLDER) {
        return Err(invalid("pattern has more than one {id} placeholder"));
    }

    let source = format!("^{}(.*){}$", regex::escape(prefix), regex::escape(suffix));
    Regex::new(&source).map_err(|e| invalid(&e.to_string()))
}
