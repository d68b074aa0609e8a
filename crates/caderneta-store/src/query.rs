use caderneta_core::domain::GroupId;
use rusqlite::types::Value;

const CONTACT_COLUMNS: &str = "id, name, phone, email, group_id, created_at, updated_at";

/// Filters for contact listings: free-text terms ANDed over name/phone/email,
/// optional group restriction.
#[derive(Debug, Default, Clone)]
pub struct ContactQuery {
    pub text_terms: Vec<String>,
    pub group_id: Option<GroupId>,
    pub ungrouped: bool,
}

pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl ContactQuery {
    pub fn with_text(text: &str) -> Self {
        ContactQuery {
            text_terms: text
                .split_whitespace()
                .map(|term| term.to_string())
                .collect(),
            ..ContactQuery::default()
        }
    }

    pub fn to_sql(&self) -> SqlQuery {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for term in &self.text_terms {
            clauses.push("(name LIKE ? OR phone LIKE ? OR email LIKE ?)".to_string());
            let like = format!("%{}%", term);
            params.push(Value::from(like.clone()));
            params.push(Value::from(like.clone()));
            params.push(Value::from(like));
        }

        if let Some(group_id) = self.group_id {
            clauses.push("group_id = ?".to_string());
            params.push(Value::from(group_id.to_string()));
        } else if self.ungrouped {
            clauses.push("group_id IS NULL".to_string());
        }

        let mut sql = format!("SELECT {} FROM contacts", CONTACT_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY name COLLATE NOCASE ASC, created_at ASC;");

        SqlQuery { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::ContactQuery;

    #[test]
    fn text_terms_become_like_clauses() {
        let query = ContactQuery::with_text("ana silva");
        let compiled = query.to_sql();
        assert_eq!(query.text_terms.len(), 2);
        assert_eq!(compiled.params.len(), 6);
        assert!(compiled.sql.contains("name LIKE ?"));
    }

    #[test]
    fn empty_query_has_no_where() {
        let compiled = ContactQuery::default().to_sql();
        assert!(!compiled.sql.contains("WHERE"));
        assert!(compiled.params.is_empty());
    }
}
