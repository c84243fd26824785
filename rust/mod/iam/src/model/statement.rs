use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

/// Whether a statement grants or refuses its actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }

    /// Parse the exact serialized spelling. Matching is case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Allow" => Some(Effect::Allow),
            "Deny" => Some(Effect::Deny),
            _ => None,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque condition block attached to a statement.
///
/// Conditions are never interpreted here. The original JSON text is kept
/// as-is and written back verbatim, so a statement that passes through the
/// editor keeps its conditions byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(Box<RawValue>);

impl Conditions {
    /// Wrap a JSON document. Fails if `json` is not valid JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Self)
    }

    /// The stored JSON text, exactly as received.
    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for Conditions {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Conditions {}

/// One Allow/Deny rule naming actions and resources.
///
/// A statement is valid when it has at least one action and at least one
/// resource; see [`crate::validate`]. The effect is always one of the two
/// enum values, so an explicit effect is guaranteed by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Statement {
    /// Optional statement id. Unique by convention only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    pub effect: Effect,

    /// Action identifiers in insertion order (`service:Verb` or `*`).
    pub actions: Vec<String>,

    /// Resource URNs or the literal `*`.
    pub resources: Vec<String>,

    /// Absent means no conditions. An explicit `null` is kept as a value.
    #[serde(
        default,
        deserialize_with = "present_conditions",
        skip_serializing_if = "Option::is_none"
    )]
    pub conditions: Option<Conditions>,
}

fn present_conditions<'de, D>(deserializer: D) -> Result<Option<Conditions>, D::Error>
where
    D: Deserializer<'de>,
{
    Conditions::deserialize(deserializer).map(Some)
}

impl Statement {
    /// A statement with the given effect and no actions or resources yet.
    pub fn new(effect: Effect) -> Self {
        Self {
            sid: None,
            effect,
            actions: Vec::new(),
            resources: Vec::new(),
            conditions: None,
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// True when the statement carries a condition block the visual editor
    /// cannot author.
    pub fn has_conditions(&self) -> bool {
        self.conditions.is_some()
    }

    /// Add `action` if absent, remove every occurrence if present.
    /// Returns whether the action is present afterwards.
    pub fn toggle_action(&mut self, action: &str) -> bool {
        toggle(&mut self.actions, action)
    }

    /// Add `resource` if absent, remove every occurrence if present.
    /// Returns whether the resource is present afterwards.
    pub fn toggle_resource(&mut self, resource: &str) -> bool {
        toggle(&mut self.resources, resource)
    }
}

fn toggle(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|x| x == item) {
        list.retain(|x| x != item);
        false
    } else {
        list.push(item.to_string());
        true
    }
}
