use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write. Carries the offending column.
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),

    /// A foreign-key constraint rejected the write (e.g. case for an
    /// unknown user).
    #[error("referenced row does not exist")]
    ForeignKey,

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Translate SQLite constraint failures into the typed variants so callers
/// can distinguish duplicates from driver errors.
pub(crate) fn map_constraint(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(e, Some(ref msg)) = err {
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
            return StoreError::ForeignKey;
        }
        if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        {
            for col in ["username", "email", "mobile"] {
                if msg.contains(&format!("users.{col}")) {
                    return StoreError::Duplicate(col);
                }
            }
            return StoreError::Duplicate("unique field");
        }
    }
    StoreError::Sqlite(err)
}
