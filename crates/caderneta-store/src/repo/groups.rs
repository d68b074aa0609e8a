use crate::error::{Result, StoreError};
use caderneta_core::domain::{Group, GroupId, GroupName};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

pub struct GroupsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> GroupsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, name: GroupName) -> Result<Group> {
        if self.find_by_name(name.as_str())?.is_some() {
            return Err(StoreError::DuplicateGroup(name.as_str().to_string()));
        }
        let group = Group {
            id: GroupId::new(),
            name,
            created_at: now_utc,
        };
        self.conn.execute(
            "INSERT INTO groups (id, name, created_at) VALUES (?1, ?2, ?3);",
            params![group.id.to_string(), group.name.as_str(), group.created_at],
        )?;
        Ok(group)
    }

    /// Returns the existing group of that name or creates it.
    pub fn upsert(&self, now_utc: i64, name: GroupName) -> Result<Group> {
        if let Some(group) = self.find_by_name(name.as_str())? {
            return Ok(group);
        }
        self.create(now_utc, name)
    }

    pub fn get(&self, id: GroupId) -> Result<Option<Group>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM groups WHERE id = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(group_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<Group>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM groups WHERE name = ?1;")?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            Ok(Some(group_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn rename(&self, id: GroupId, name: GroupName) -> Result<Group> {
        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM groups WHERE name = ?1 AND id != ?2;",
                params![name.as_str(), id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StoreError::DuplicateGroup(name.as_str().to_string()));
        }

        let updated = self.conn.execute(
            "UPDATE groups SET name = ?2 WHERE id = ?1;",
            params![id.to_string(), name.as_str()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("group {id}")));
        }
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(format!("group {id}")))
    }

    /// Deletes the group; member contacts survive with their group cleared
    /// (`ON DELETE SET NULL`).
    pub fn delete(&self, id: GroupId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM groups WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("group {id}")));
        }
        Ok(())
    }

    pub fn list_with_counts(&self) -> Result<Vec<(Group, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT groups.id, groups.name, groups.created_at, COUNT(contacts.id) AS cnt
             FROM groups
             LEFT JOIN contacts ON groups.id = contacts.group_id
             GROUP BY groups.id, groups.name, groups.created_at
             ORDER BY groups.name COLLATE NOCASE ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let group = group_from_row(row)?;
            let count: i64 = row.get(3)?;
            items.push((group, count));
        }
        Ok(items)
    }
}

fn group_from_row(row: &rusqlite::Row<'_>) -> Result<Group> {
    let id_str: String = row.get(0)?;
    let id = GroupId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str))?;
    let name_str: String = row.get(1)?;
    let name = GroupName::new(&name_str).map_err(StoreError::Core)?;
    Ok(Group {
        id,
        name,
        created_at: row.get(2)?,
    })
}
