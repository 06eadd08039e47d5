//! Per-user armor inventory, with hash-map semantics over the
//! `inventory` table.

use std::collections::BTreeMap;

use armory_core::ArmorField;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::user::{user_prefix, User};

/// The one inventory area currently in use.
pub const ARMOR_AREA: &str = "armor";

/// A user's view of the inventory table.
pub struct UserInventory<'a> {
    conn: &'a Connection,
    prefix: String,
}

impl<'a> UserInventory<'a> {
    pub fn new(conn: &'a Connection, user: &User) -> UserInventory<'a> {
        UserInventory {
            conn,
            prefix: user_prefix(user),
        }
    }

    /// One armor's field, decoded through the legacy fallback chain.
    pub fn get(&self, actor_name: &str) -> Result<Option<ArmorField>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM inventory
                 WHERE user_prefix = ?1 AND area = ?2 AND field = ?3",
                params![self.prefix, ARMOR_AREA, actor_name],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|raw| ArmorField::parse(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// The full actor-name → field map for this user.
    pub fn get_all(&self) -> Result<BTreeMap<String, ArmorField>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT field, value FROM inventory
             WHERE user_prefix = ?1 AND area = ?2",
        )?;
        let rows = stmt.query_map(params![self.prefix, ARMOR_AREA], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut all = BTreeMap::new();
        for row in rows {
            let (actor_name, raw) = row?;
            all.insert(actor_name, ArmorField::parse(&raw)?);
        }
        Ok(all)
    }

    /// Apply a partial patch: `None` removes the field, a value upserts
    /// it. Always writes the structured encoding, regardless of what was
    /// stored before.
    pub fn set_many(
        &self,
        patch: &BTreeMap<String, Option<ArmorField>>,
    ) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        for (actor_name, field) in patch {
            match field {
                None => {
                    self.conn.execute(
                        "DELETE FROM inventory
                         WHERE user_prefix = ?1 AND area = ?2 AND field = ?3",
                        params![self.prefix, ARMOR_AREA, actor_name],
                    )?;
                }
                Some(field) => {
                    let value = serde_json::to_string(field)?;
                    self.conn.execute(
                        "INSERT INTO inventory (user_prefix, area, field, value, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)
                         ON CONFLICT(user_prefix, area, field) DO UPDATE SET
                             value = excluded.value,
                             updated_at = excluded.updated_at",
                        params![self.prefix, ARMOR_AREA, actor_name, value, now],
                    )?;
                }
            }
        }
        Ok(())
    }
}
