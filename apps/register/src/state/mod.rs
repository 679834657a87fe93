//! # State Module
//!
//! Manages application state for the register.
//!
//! ## Why Multiple State Types?
//! Instead of a single struct containing everything, we use separate
//! state types and commands declare exactly what state they need:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      ManagedState (ipc)                          │   │
//! │  │  db: DbState                                                    │   │
//! │  │  register: RegisterState                                        │   │
//! │  │  config: ConfigState                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │  RegisterState   │  │   ConfigState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  Mutex<          │  │  store_name      │          │
//! │  │  (SQLite     │  │   RegisterSession│  │  receipt footer  │          │
//! │  │   pool)      │  │  > + latch       │  │  receipt width   │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • RegisterState: tokio Mutex, held across the save of a mutation      │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod register;

pub use config::ConfigState;
pub use db::DbState;
pub use register::RegisterState;
