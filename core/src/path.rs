//! URL path composition with percent-encoded segments.
//!
//! String identifiers are fully percent-encoded, including `/` and `.`, so a
//! `"group/project"` id or an `"A/B"` tag name stays a single segment and a
//! dotted name is never mistaken for a format suffix. Numeric identifiers are
//! written as plain decimals. Nothing here rejects input; a bad identifier
//! only surfaces as an HTTP error from the server.

use std::fmt;

/// A path identifier: either a numeric id or a string such as a
/// `namespace/project` path or a tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    Id(u64),
    Path(String),
}

impl ResourceId {
    /// Reads an identifier out of a decoded JSON field.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number.as_u64().map(ResourceId::Id),
            serde_json::Value::String(path) => Some(ResourceId::Path(path.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ResourceId::Id(id) => serde_json::Value::from(*id),
            ResourceId::Path(path) => serde_json::Value::String(path.clone()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Id(id) => write!(f, "{id}"),
            ResourceId::Path(path) => f.write_str(path),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        ResourceId::Id(id)
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        ResourceId::Id(u64::from(id))
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        u64::try_from(id)
            .map(ResourceId::Id)
            .unwrap_or_else(|_| ResourceId::Path(id.to_string()))
    }
}

impl From<&str> for ResourceId {
    fn from(path: &str) -> Self {
        ResourceId::Path(path.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(path: String) -> Self {
        ResourceId::Path(path)
    }
}

/// Encodes one path segment.
pub fn encode_segment(id: &ResourceId) -> String {
    match id {
        ResourceId::Id(id) => id.to_string(),
        ResourceId::Path(path) => urlencoding::encode(path).replace('.', "%2E"),
    }
}

/// Prefixes `suffix` with the encoded project scope.
///
/// `suffix` is taken literally; callers encode its variable segments first.
pub fn project_path(project: &ResourceId, suffix: &str) -> String {
    let project = encode_segment(project);
    if suffix.is_empty() {
        format!("projects/{project}")
    } else {
        format!("projects/{project}/{}", suffix.trim_start_matches('/'))
    }
}
