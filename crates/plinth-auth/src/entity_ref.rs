//! Entity references of the form `kind:namespace/name`.
//!
//! The namespace may be omitted (`user:jane`), in which case it is
//! `default`. References are carried verbatim inside tokens; parsing only
//! validates their shape.

use std::fmt;

pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    pub fn parse(value: &str) -> Result<Self, String> {
        let (kind, rest) = value
            .split_once(':')
            .ok_or_else(|| format!("entity ref '{value}' is missing a kind"))?;

        let (namespace, name) = match rest.split_once('/') {
            Some((namespace, name)) => (namespace, name),
            None => (DEFAULT_NAMESPACE, rest),
        };

        if kind.is_empty() || namespace.is_empty() || name.is_empty() {
            return Err(format!("entity ref '{value}' is malformed"));
        }
        if name.contains(['/', ':']) || value.chars().any(char::is_whitespace) {
            return Err(format!("entity ref '{value}' contains invalid characters"));
        }

        Ok(Self {
            kind: kind.to_lowercase(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace, self.name)
    }
}
