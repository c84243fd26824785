use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, ffi, params};

use crate::error::IamError;
use crate::model::{Policy, PolicyAttachment};
use crate::store::IamStore;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    -- Policies: descriptive columns for listing, full record as JSON
    CREATE TABLE IF NOT EXISTS policies (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_policies_name ON policies(name);

    -- Attachments: one row per (policy, principal) pair
    CREATE TABLE IF NOT EXISTS policy_attachments (
        id TEXT PRIMARY KEY,
        policy_id TEXT NOT NULL,
        principal_urn TEXT NOT NULL,
        attached_on TEXT NOT NULL,
        UNIQUE (policy_id, principal_urn),
        FOREIGN KEY (policy_id) REFERENCES policies(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_policy_attachments_principal
        ON policy_attachments(principal_urn);
";

/// IamStore backed by rusqlite (bundled SQLite).
///
/// Attachment uniqueness is the table's `UNIQUE (policy_id, principal_urn)`
/// constraint, so a duplicate insert fails inside SQLite itself.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, IamError> {
        let conn = Connection::open(path).map_err(storage)?;
        // WAL for concurrent readers alongside the console's writer.
        conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(storage)?;
        Self::init(conn)
    }

    /// Create an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self, IamError> {
        Self::init(Connection::open_in_memory().map_err(storage)?)
    }

    fn init(conn: Connection) -> Result<Self, IamError> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, IamError> {
        self.conn
            .lock()
            .map_err(|e| IamError::Storage(e.to_string()))
    }
}

fn storage(e: rusqlite::Error) -> IamError {
    IamError::Storage(e.to_string())
}

fn extended_code(e: &rusqlite::Error) -> Option<i32> {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => Some(err.extended_code),
        _ => None,
    }
}

fn encode(policy: &Policy) -> Result<String, IamError> {
    serde_json::to_string(policy).map_err(|e| IamError::Internal(e.to_string()))
}

fn decode(data: &str) -> Result<Policy, IamError> {
    serde_json::from_str(data).map_err(|e| IamError::Internal(e.to_string()))
}

fn attachment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PolicyAttachment> {
    Ok(PolicyAttachment {
        id: row.get(0)?,
        policy_id: row.get(1)?,
        principal_urn: row.get(2)?,
        attached_on: row.get(3)?,
    })
}

impl IamStore for SqliteStore {
    fn insert_policy(&self, policy: &Policy) -> Result<(), IamError> {
        let data = encode(policy)?;
        self.conn()?
            .execute(
                "INSERT INTO policies (id, name, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![policy.id, policy.name, data, policy.created_at, policy.updated_at],
            )
            .map_err(storage)?;
        Ok(())
    }

    fn get_policy(&self, id: &str) -> Result<Policy, IamError> {
        let data: Option<String> = self
            .conn()?
            .query_row("SELECT data FROM policies WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage)?;
        match data {
            Some(data) => decode(&data),
            None => Err(IamError::PolicyNotFound(id.to_string())),
        }
    }

    fn list_policies(&self) -> Result<Vec<Policy>, IamError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT data FROM policies ORDER BY rowid")
            .map_err(storage)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(storage)?;

        let mut policies = Vec::new();
        for data in rows {
            policies.push(decode(&data.map_err(storage)?)?);
        }
        Ok(policies)
    }

    fn update_policy(&self, policy: &Policy) -> Result<(), IamError> {
        let data = encode(policy)?;
        let affected = self
            .conn()?
            .execute(
                "UPDATE policies SET name = ?1, data = ?2, updated_at = ?3 WHERE id = ?4",
                params![policy.name, data, policy.updated_at, policy.id],
            )
            .map_err(storage)?;
        if affected == 0 {
            return Err(IamError::PolicyNotFound(policy.id.clone()));
        }
        Ok(())
    }

    fn delete_policy(&self, id: &str) -> Result<(), IamError> {
        let affected = self
            .conn()?
            .execute("DELETE FROM policies WHERE id = ?1", params![id])
            .map_err(storage)?;
        if affected == 0 {
            return Err(IamError::PolicyNotFound(id.to_string()));
        }
        Ok(())
    }

    fn insert_attachment(&self, attachment: &PolicyAttachment) -> Result<(), IamError> {
        let result = self.conn()?.execute(
            "INSERT INTO policy_attachments (id, policy_id, principal_urn, attached_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                attachment.id,
                attachment.policy_id,
                attachment.principal_urn,
                attachment.attached_on
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(match extended_code(&e) {
                Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => IamError::AlreadyAttached {
                    policy_id: attachment.policy_id.clone(),
                    principal_urn: attachment.principal_urn.clone(),
                },
                Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    IamError::PolicyNotFound(attachment.policy_id.clone())
                }
                _ => storage(e),
            }),
        }
    }

    fn delete_attachment(&self, policy_id: &str, attachment_id: &str) -> Result<(), IamError> {
        let affected = self
            .conn()?
            .execute(
                "DELETE FROM policy_attachments WHERE id = ?1 AND policy_id = ?2",
                params![attachment_id, policy_id],
            )
            .map_err(storage)?;
        if affected == 0 {
            return Err(IamError::AttachmentNotFound {
                policy_id: policy_id.to_string(),
                attachment_id: attachment_id.to_string(),
            });
        }
        Ok(())
    }

    fn attachments_for_policy(&self, policy_id: &str) -> Result<Vec<PolicyAttachment>, IamError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, policy_id, principal_urn, attached_on FROM policy_attachments
                 WHERE policy_id = ?1 ORDER BY rowid",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![policy_id], attachment_from_row)
            .map_err(storage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage)
    }

    fn attachments_for_principal(
        &self,
        principal_urn: &str,
    ) -> Result<Vec<PolicyAttachment>, IamError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, policy_id, principal_urn, attached_on FROM policy_attachments
                 WHERE principal_urn = ?1 ORDER BY rowid",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![principal_urn], attachment_from_row)
            .map_err(storage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage)
    }
}
