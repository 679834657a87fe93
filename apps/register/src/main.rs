//! # Till Register Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Register                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Register Front End                          │  │
//! │  │  • Product Grid        • Cart Panel                              │  │
//! │  │  • Calculator          • Receipt Preview                         │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                    JSON lines on stdin / stdout                         │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Back End (this crate)                    │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Calls lib.rs, reports fatal errors               │  │
//! │  │  lib.rs ─────► Logging, database, state, command loop           │  │
//! │  │  commands/ ──► add_to_cart, press_calculator_key, checkout      │  │
//! │  │  state/ ─────► DbState, RegisterState, ConfigState              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  till.db (local file, WAL mode, kv_store table)                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match till_register_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("till-register: {}", e);
            ExitCode::FAILURE
        }
    }
}
