use crate::domain::ids::GroupId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_group_name(raw)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: GroupName,
    pub created_at: i64,
}

/// Collapses internal whitespace; group names keep their case for display
/// but are unique case-sensitively at the store level.
pub fn normalize_group_name(raw: &str) -> Result<String, CoreError> {
    let mut out = String::with_capacity(raw.len());
    for part in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }

    if out.is_empty() {
        return Err(CoreError::InvalidGroupName);
    }

    Ok(out)
}
