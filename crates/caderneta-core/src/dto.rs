use crate::domain::{ContactId, GroupId};
use crate::rules::DuplicateKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactListItemDto {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<DuplicateKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetailDto {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub phone_key: Option<String>,
    pub email: Option<String>,
    pub group_id: Option<GroupId>,
    pub group: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupListItemDto {
    pub id: GroupId,
    pub name: String,
    pub contacts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsDto {
    pub contacts: usize,
    pub groups: usize,
    pub duplicate_groups: usize,
    pub duplicate_contacts: usize,
    pub invalid_phones: usize,
    pub per_group: Vec<GroupListItemDto>,
}
