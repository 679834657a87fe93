//! # Receipt Rendering
//!
//! Formats a [`Transaction`] as fixed-width plain text for the receipt
//! dialog and the printer.
//!
//! ## Layout (width 38)
//! ```text
//! ======================================
//!                Till POS
//! ======================================
//! Time: 2023-11-14 22:13:20 UTC
//! Receipt #: 1700000000000
//! --------------------------------------
//! Americano            3 X  65.00
//!             Subtotal            195.00
//! --------------------------------------
//! Items:                               3
//! Receivable:                     195.00
//! Tendered:                       250.00
//! Change:                          55.00
//! ======================================
//!        Thank you for shopping!
//! ======================================
//! ```

use serde::{Deserialize, Serialize};

use crate::ledger::Transaction;
use crate::money::Money;

/// Title, footer and width of a printed receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLayout {
    pub title: String,
    pub footer: String,
    pub width: usize,
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        ReceiptLayout {
            title: "Till POS".to_string(),
            footer: "Thank you for shopping!".to_string(),
            width: 38,
        }
    }
}

/// Renders a transaction as receipt text (one `\n` after every line).
pub fn render(tx: &Transaction, layout: &ReceiptLayout) -> String {
    let width = layout.width;
    let heavy = "=".repeat(width);
    let light = "-".repeat(width);

    let mut lines = vec![
        heavy.clone(),
        centered(&layout.title, width),
        heavy.clone(),
        format!("Time: {}", tx.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Receipt #: {}", tx.id),
        light.clone(),
    ];

    for item in &tx.line_items {
        lines.push(format!(
            "{:<20} {} X {:>6}",
            item.name,
            item.quantity,
            item.unit_price.format_plain()
        ));
        lines.push(format!(
            "{:>20} {:>17}",
            "Subtotal",
            item.line_total.format_plain()
        ));
    }

    lines.push(light);
    lines.push(labeled("Items:", &tx.total_units.to_string(), width));
    lines.push(amount("Receivable:", tx.receivable, width));
    lines.push(amount("Tendered:", tx.tendered, width));
    lines.push(amount("Change:", tx.change, width));
    lines.push(heavy.clone());
    lines.push(centered(&layout.footer, width));
    lines.push(heavy);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn amount(label: &str, value: Money, width: usize) -> String {
    labeled(label, &value.format_plain(), width)
}

fn labeled(label: &str, value: &str, width: usize) -> String {
    let pad = width.saturating_sub(label.chars().count()).max(value.len());
    format!("{label}{value:>pad$}")
}

fn centered(text: &str, width: usize) -> String {
    format!("{text:^width$}").trim_end().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionLine;
    use chrono::{TimeZone, Utc};

    fn sale() -> Transaction {
        Transaction {
            id: 1_700_000_000_000,
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            line_items: vec![
                TransactionLine {
                    product_id: 201,
                    name: "Americano".to_string(),
                    unit_price: Money::from_cents(6500),
                    quantity: 3,
                    line_total: Money::from_cents(19500),
                },
                TransactionLine {
                    product_id: 102,
                    name: "Hand-made Cookies (Box)".to_string(),
                    unit_price: Money::from_cents(12000),
                    quantity: 1,
                    line_total: Money::from_cents(12000),
                },
            ],
            receivable: Money::from_cents(31500),
            tendered: Money::from_cents(40000),
            change: Money::from_cents(8500),
            total_units: 4,
        }
    }

    #[test]
    fn test_render_contains_every_field() {
        let text = render(&sale(), &ReceiptLayout::default());

        assert!(text.contains("Receipt #: 1700000000000"));
        assert!(text.contains("Time: 2023-11-14 22:13:20 UTC"));
        assert!(text.contains("Americano            3 X  65.00"));
        assert!(text.contains("Hand-made Cookies (Box) 1 X 120.00"));
        assert!(text.contains("195.00"));
        assert!(text.ends_with("======================================\n"));
    }

    #[test]
    fn test_totals_are_right_aligned_to_width() {
        let text = render(&sale(), &ReceiptLayout::default());

        for label in ["Items:", "Receivable:", "Tendered:", "Change:"] {
            let line = text.lines().find(|l| l.starts_with(label)).unwrap();
            assert_eq!(line.len(), 38, "{line}");
        }
        assert!(text.contains("Change:                          85.00"));
    }

    #[test]
    fn test_custom_layout() {
        let layout = ReceiptLayout {
            title: "Corner Cafe".to_string(),
            footer: "See you soon".to_string(),
            width: 30,
        };
        let text = render(&sale(), &layout);
        let first = text.lines().next().unwrap();

        assert_eq!(first, "=".repeat(30));
        assert!(text.lines().any(|l| l.trim() == "Corner Cafe"));
        assert!(text.lines().any(|l| l.trim() == "See you soon"));
    }
}
