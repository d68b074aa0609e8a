use crate::error::{Result, StoreError};
use crate::query::ContactQuery;
use caderneta_core::domain::{normalize_phone, Contact, ContactId, GroupId};
use rusqlite::{params, params_from_iter, Connection};
use std::str::FromStr;

const COLUMNS: &str = "id, name, phone, email, group_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ContactNew {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub group_id: Option<GroupId>,
}

/// Field-wise update: outer `None` leaves a field alone, inner `None`
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<Option<String>>,
    pub group_id: Option<Option<GroupId>>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.group_id.is_none()
    }
}

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: ContactNew) -> Result<Contact> {
        let contact = Contact {
            id: ContactId::new(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            group_id: input.group_id,
            created_at: now_utc,
            updated_at: now_utc,
        };
        contact.validate()?;

        let phone_key = normalize_phone(&contact.phone);
        self.conn.execute(
            "INSERT INTO contacts (id, name, phone, phone_key, email, group_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                contact.id.to_string(),
                contact.name,
                contact.phone,
                phone_key.as_ref().map(|key| key.as_str()),
                contact.email,
                contact.group_id.map(|id| id.to_string()),
                contact.created_at,
                contact.updated_at,
            ],
        )?;
        Ok(contact)
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(contact_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn update(&self, now_utc: i64, id: ContactId, update: ContactUpdate) -> Result<Contact> {
        let tx = self.conn.unchecked_transaction()?;
        let contact = update_inner(&tx, now_utc, id, update)?;
        tx.commit()?;
        Ok(contact)
    }

    pub fn delete(&self, id: ContactId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("contact {id}")));
        }
        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<Contact>> {
        self.list(&ContactQuery::default())
    }

    pub fn list(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
        let compiled = query.to_sql();
        let mut stmt = self.conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params_from_iter(compiled.params))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    /// Contacts whose stored phone canonicalizes to the same key as `raw`.
    /// Unnormalizable input matches nothing: rows with NULL phone_key are
    /// never equal to anything.
    pub fn find_by_phone(&self, raw: &str) -> Result<Vec<Contact>> {
        let Some(key) = normalize_phone(raw) else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE phone_key = ?1 ORDER BY created_at ASC;"
        ))?;
        let mut rows = stmt.query([key.as_str()])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM contacts;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn update_inner(
    conn: &Connection,
    now_utc: i64,
    id: ContactId,
    update: ContactUpdate,
) -> Result<Contact> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    let Some(row) = rows.next()? else {
        return Err(StoreError::NotFound(format!("contact {id}")));
    };
    let mut contact = contact_from_row(row)?;
    drop(rows);
    drop(stmt);

    if let Some(name) = update.name {
        contact.name = name;
    }
    if let Some(phone) = update.phone {
        contact.phone = phone;
    }
    if let Some(email) = update.email {
        contact.email = email;
    }
    if let Some(group_id) = update.group_id {
        contact.group_id = group_id;
    }
    contact.updated_at = now_utc;
    contact.validate()?;

    let phone_key = normalize_phone(&contact.phone);
    conn.execute(
        "UPDATE contacts
         SET name = ?2, phone = ?3, phone_key = ?4, email = ?5, group_id = ?6, updated_at = ?7
         WHERE id = ?1;",
        params![
            contact.id.to_string(),
            contact.name,
            contact.phone,
            phone_key.as_ref().map(|key| key.as_str()),
            contact.email,
            contact.group_id.map(|id| id.to_string()),
            contact.updated_at,
        ],
    )?;
    Ok(contact)
}

fn contact_from_row(row: &rusqlite::Row<'_>) -> Result<Contact> {
    let id_str: String = row.get(0)?;
    let id = ContactId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let group_id = match row.get::<_, Option<String>>(4)? {
        Some(raw) => Some(GroupId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw))?),
        None => None,
    };
    Ok(Contact {
        id,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        group_id,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
