use crate::domain::ids::{ContactId, GroupId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub group_id: Option<GroupId>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Contact {
    /// Structural validation only: phone validity is checked at the edges
    /// (add/import), since stored contacts may carry legacy raw numbers.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Contact;
    use crate::domain::ContactId;
    use crate::error::CoreError;

    fn contact(name: &str) -> Contact {
        Contact {
            id: ContactId::new(),
            name: name.to_string(),
            phone: "11987654321".to_string(),
            email: None,
            group_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn validate_requires_name() {
        assert_eq!(contact("   ").validate(), Err(CoreError::EmptyName));
        assert!(contact("Ana Souza").validate().is_ok());
    }
}
