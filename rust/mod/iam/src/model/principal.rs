use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IamError;

/// Kind of principal a policy can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Group,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::User => "user",
            PrincipalKind::Group => "group",
        }
    }
}

/// A user or group address: `urn:<namespace>:iam::user/<id>` or
/// `urn:<namespace>:iam::group/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrincipalUrn {
    namespace: String,
    kind: PrincipalKind,
    id: String,
}

impl PrincipalUrn {
    pub fn user(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            kind: PrincipalKind::User,
            id: id.into(),
        }
    }

    pub fn group(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            kind: PrincipalKind::Group,
            id: id.into(),
        }
    }

    /// Parse a principal URN. Wildcard ids are rejected: an attachment
    /// always names one concrete user or group.
    pub fn parse(urn: &str) -> Result<Self, IamError> {
        let invalid = || IamError::InvalidPrincipal(urn.to_string());

        let rest = urn.strip_prefix("urn:").ok_or_else(invalid)?;
        let (namespace, rest) = rest.split_once(':').ok_or_else(invalid)?;
        let rest = rest.strip_prefix("iam::").ok_or_else(invalid)?;
        let (kind, id) = rest.split_once('/').ok_or_else(invalid)?;

        let kind = match kind {
            "user" => PrincipalKind::User,
            "group" => PrincipalKind::Group,
            _ => return Err(invalid()),
        };
        if namespace.is_empty() || id.is_empty() || id == "*" || id.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            namespace: namespace.to_string(),
            kind,
            id: id.to_string(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for PrincipalUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urn:{}:iam::{}/{}", self.namespace, self.kind.as_str(), self.id)
    }
}

impl FromStr for PrincipalUrn {
    type Err = IamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
