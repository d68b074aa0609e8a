//! Duplicate detection over a contact collection.
//!
//! Contacts are grouped by canonical phone key and by normalized email in one
//! pass. Phones that fail to normalize and absent emails are excluded from
//! grouping entirely, so malformed data is treated as unique rather than
//! producing false duplicates.

use crate::domain::{normalize_email, normalize_phone, Contact, ContactId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    Phone,
    Email,
}

impl DuplicateKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DuplicateKind::Phone => "phone",
            DuplicateKind::Email => "email",
        }
    }
}

/// A set of contacts sharing one phone key or one normalized email.
/// Ephemeral: recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub kind: DuplicateKind,
    pub key: String,
    pub contact_ids: Vec<ContactId>,
}

/// Annotates each contact with the field it duplicates on, preserving input
/// order. Phone wins when a contact duplicates on both fields.
pub fn annotate_duplicates(contacts: &[Contact]) -> Vec<Option<DuplicateKind>> {
    let mut phone_counts: HashMap<String, usize> = HashMap::new();
    let mut email_counts: HashMap<String, usize> = HashMap::new();

    for contact in contacts {
        if let Some(key) = normalize_phone(&contact.phone) {
            *phone_counts.entry(key.as_str().to_string()).or_default() += 1;
        }
        if let Some(email) = contact.email.as_deref().and_then(normalize_email) {
            *email_counts.entry(email).or_default() += 1;
        }
    }

    contacts
        .iter()
        .map(|contact| {
            if let Some(key) = normalize_phone(&contact.phone) {
                if phone_counts.get(key.as_str()).copied().unwrap_or(0) > 1 {
                    return Some(DuplicateKind::Phone);
                }
            }
            if let Some(email) = contact.email.as_deref().and_then(normalize_email) {
                if email_counts.get(&email).copied().unwrap_or(0) > 1 {
                    return Some(DuplicateKind::Email);
                }
            }
            None
        })
        .collect()
}

/// Materializes the duplicate groups for reporting, largest first, ties
/// broken by key. A contact duplicated on both fields appears in both its
/// phone group and its email group.
pub fn duplicate_groups(contacts: &[Contact]) -> Vec<DuplicateGroup> {
    let mut by_phone: HashMap<String, Vec<ContactId>> = HashMap::new();
    let mut by_email: HashMap<String, Vec<ContactId>> = HashMap::new();

    for contact in contacts {
        if let Some(key) = normalize_phone(&contact.phone) {
            by_phone
                .entry(key.as_str().to_string())
                .or_default()
                .push(contact.id);
        }
        if let Some(email) = contact.email.as_deref().and_then(normalize_email) {
            by_email.entry(email).or_default().push(contact.id);
        }
    }

    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (kind, map) in [
        (DuplicateKind::Phone, by_phone),
        (DuplicateKind::Email, by_email),
    ] {
        for (key, contact_ids) in map {
            if contact_ids.len() > 1 {
                groups.push(DuplicateGroup {
                    kind,
                    key,
                    contact_ids,
                });
            }
        }
    }

    groups.sort_by(|a, b| {
        b.contact_ids
            .len()
            .cmp(&a.contact_ids.len())
            .then_with(|| a.key.cmp(&b.key))
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::{annotate_duplicates, duplicate_groups, DuplicateKind};
    use crate::domain::{Contact, ContactId};

    fn contact(phone: &str, email: Option<&str>) -> Contact {
        Contact {
            id: ContactId::new(),
            name: "Contato".to_string(),
            phone: phone.to_string(),
            email: email.map(str::to_string),
            group_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn flags_cross_format_phone_duplicates() {
        let contacts = vec![
            contact("11987654321", None),
            contact("1187654321", None),
            contact("21999998888", None),
        ];
        let marks = annotate_duplicates(&contacts);
        assert_eq!(marks[0], Some(DuplicateKind::Phone));
        assert_eq!(marks[1], Some(DuplicateKind::Phone));
        assert_eq!(marks[2], None);
    }

    #[test]
    fn flags_email_duplicates_case_insensitively() {
        let contacts = vec![
            contact("11987654321", Some("A@x.com")),
            contact("21912345678", Some("a@x.com")),
        ];
        let marks = annotate_duplicates(&contacts);
        assert_eq!(marks[0], Some(DuplicateKind::Email));
        assert_eq!(marks[1], Some(DuplicateKind::Email));
    }

    #[test]
    fn phone_wins_when_duplicated_on_both_fields() {
        let contacts = vec![
            contact("11987654321", Some("ana@x.com")),
            contact("1187654321", Some("ana@x.com")),
        ];
        let marks = annotate_duplicates(&contacts);
        assert_eq!(marks[0], Some(DuplicateKind::Phone));
        assert_eq!(marks[1], Some(DuplicateKind::Phone));
    }

    #[test]
    fn malformed_phones_are_never_duplicates() {
        let contacts = vec![contact("123", None), contact("123", None)];
        let marks = annotate_duplicates(&contacts);
        assert_eq!(marks, vec![None, None]);
    }

    #[test]
    fn annotation_preserves_input_order() {
        let contacts = vec![
            contact("21999998888", None),
            contact("11987654321", None),
            contact("1187654321", None),
        ];
        let marks = annotate_duplicates(&contacts);
        assert_eq!(marks.len(), 3);
        assert_eq!(marks[0], None);
        assert_eq!(marks[1], Some(DuplicateKind::Phone));
    }

    #[test]
    fn groups_are_ordered_by_size_then_key() {
        let contacts = vec![
            contact("11987654321", None),
            contact("1187654321", None),
            contact("11912345678", None),
            contact("1112345678", None),
            contact("21912345678", None),
        ];
        let groups = duplicate_groups(&contacts);
        assert_eq!(groups.len(), 2);
        // The area code is not part of the key, so 11- and 21-DDD numbers
        // with the same base land in one group; the larger group sorts first.
        assert_eq!(groups[0].key, "12345678");
        assert_eq!(groups[0].contact_ids.len(), 3);
        assert_eq!(groups[1].key, "87654321");
        assert_eq!(groups[1].contact_ids.len(), 2);
    }

    #[test]
    fn contact_in_both_fields_appears_in_both_groups() {
        let contacts = vec![
            contact("11987654321", Some("ana@x.com")),
            contact("1187654321", Some("ANA@x.com")),
        ];
        let groups = duplicate_groups(&contacts);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().any(|g| g.kind == DuplicateKind::Phone));
        assert!(groups.iter().any(|g| g.kind == DuplicateKind::Email));
    }
}
