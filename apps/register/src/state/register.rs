//! # Register State
//!
//! The live [`RegisterSession`] plus the checkout latch.
//!
//! ## Mutation Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lock session ──► clone ──► mutate clone ──► save ──► swap in           │
//! │                                  │             │                        │
//! │                                  ▼             ▼                        │
//! │                              rule error    db error                     │
//! │                                  └──────┬──────┘                        │
//! │                                         ▼                               │
//! │                         live session untouched                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart and calculator edits are never saved, so they mutate in place.

use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use till_core::{CheckoutLatch, RegisterSession};
use till_db::{Database, DbResult};

/// Shared register session.
#[derive(Debug)]
pub struct RegisterState {
    session: Mutex<RegisterSession>,
    latch: CheckoutLatch,
}

impl RegisterState {
    /// Wraps an existing session.
    pub fn new(session: RegisterSession) -> Self {
        RegisterState {
            session: Mutex::new(session),
            latch: CheckoutLatch::new(),
        }
    }

    /// Restores the session from the saved catalog and ledger.
    pub async fn load(db: &Database) -> DbResult<Self> {
        let catalog = db.catalog().load().await?;
        let ledger = db.ledger().load().await?;

        info!(
            products = catalog.len(),
            transactions = ledger.len(),
            "Register session restored"
        );

        Ok(Self::new(RegisterSession::from_parts(catalog, ledger)))
    }

    /// Locks the session for the duration of one command.
    pub async fn lock(&self) -> MutexGuard<'_, RegisterSession> {
        self.session.lock().await
    }

    /// Guard against a second checkout while one is saving.
    pub fn latch(&self) -> &CheckoutLatch {
        &self.latch
    }
}
