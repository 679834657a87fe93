//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TILL_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use till_core::ReceiptLayout;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (printed at the top of receipts)
    pub store_name: String,

    /// Closing line printed at the bottom of receipts
    pub receipt_footer: String,

    /// Receipt width in characters
    pub receipt_width: usize,

    /// Explicit database file. `None` means the platform data directory.
    #[serde(skip)]
    pub database_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "Till POS"
    /// - Footer: "Thank you for shopping!"
    /// - Width: 38 characters
    /// - Database: platform data directory
    fn default() -> Self {
        let layout = ReceiptLayout::default();
        ConfigState {
            store_name: layout.title,
            receipt_footer: layout.footer,
            receipt_width: layout.width,
            database_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TILL_STORE_NAME`: Override store name
    /// - `TILL_RECEIPT_FOOTER`: Override receipt footer
    /// - `TILL_RECEIPT_WIDTH`: Override receipt width (e.g., "42")
    /// - `TILL_DB_PATH`: Use this database file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("TILL_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(footer) = lookup("TILL_RECEIPT_FOOTER") {
            config.receipt_footer = footer;
        }

        if let Some(width_str) = lookup("TILL_RECEIPT_WIDTH") {
            match width_str.parse::<usize>() {
                // Narrower than the item rows would break the layout
                Ok(width) if width >= 38 => config.receipt_width = width,
                _ => tracing::warn!(value = %width_str, "Ignoring invalid TILL_RECEIPT_WIDTH"),
            }
        }

        if let Some(path) = lookup("TILL_DB_PATH").filter(|p| !p.is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Receipt layout for this store.
    pub fn receipt_layout(&self) -> ReceiptLayout {
        ReceiptLayout {
            title: self.store_name.clone(),
            footer: self.receipt_footer.clone(),
            width: self.receipt_width,
        }
    }
}
