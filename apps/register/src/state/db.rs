//! # Database State
//!
//! Wraps the `Database` connection for use in register commands.
//!
//! ## Thread Safety
//! The `Database` struct from `till-db` contains a `SqlitePool` which
//! is inherently thread-safe. Commands only touch it while holding the
//! register session lock, so catalog and ledger writes never interleave.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! async fn delete_product(
//!     db: &DbState,
//!     register: &RegisterState,
//!     id: u64,
//! ) -> Result<(), ApiError> {
//!     let mut session = register.lock().await;
//!     let mut staged = session.clone();
//!     staged.remove_product(id);
//!     db.inner().catalog().save(staged.catalog()).await?;
//!     *session = staged;
//!     Ok(())
//! }
//! ```

use till_db::Database;

/// Wrapper around `Database` for register state management.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
