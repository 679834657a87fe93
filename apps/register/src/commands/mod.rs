//! # Register Commands Module
//!
//! All commands exposed to the register front end.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── product.rs     ◄─── Catalog CRUD, import, export
//! ├── cart.rs        ◄─── Cart manipulation, tendered amount
//! ├── calculator.rs  ◄─── Keypad for the tendered amount
//! ├── sale.rs        ◄─── Checkout, history, receipts
//! └── config.rs      ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Register Command Flow                                │
//! │                                                                         │
//! │  Front end                                                              │
//! │  ─────────                                                              │
//! │  {"id": 7, "cmd": "add_to_cart", "args": {"productId": 201}}            │
//! │         │                                                               │
//! │         │ (one JSON line on stdin, see `ipc`)                           │
//! │         ▼                                                               │
//! │  Rust back end                                                          │
//! │  ─────────────                                                          │
//! │  async fn add_to_cart(                                                  │
//! │      register: &RegisterState,  ◄── Passed by the dispatcher           │
//! │      product_id: u64,           ◄── From args                          │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  {"id": 7, "ok": true, "data": {"lines": [...], ...}}                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the session
//! async fn get_cart(register: &RegisterState)
//!
//! // Saves the catalog
//! async fn save_product(db: &DbState, register: &RegisterState, ...)
//!
//! // Saves and prints
//! async fn checkout(db: &DbState, register: &RegisterState, config: &ConfigState, ...)
//! ```

pub mod calculator;
pub mod cart;
pub mod config;
pub mod product;
pub mod sale;

#[cfg(test)]
pub(crate) mod test_support {
    use till_db::{Database, DbConfig};

    use crate::state::{DbState, RegisterState};

    /// Fresh in-memory database and a register restored from it.
    pub async fn fresh() -> (DbState, RegisterState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let register = RegisterState::load(&db).await.unwrap();
        (DbState::new(db), register)
    }
}
