//! # Calculator Commands
//!
//! The on-screen keypad used to work out the tendered amount.
//!
//! Keys arrive as their labels (`"7"`, `"."`, `"+"`, `"="`, `"%"`, `"C"`,
//! `"CE"`, `"apply"`). `apply` copies the display into the tendered
//! amount, so the response carries the payment totals too.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::RegisterState;
use till_core::{CalculatorView, Key, RegisterSession};

/// Calculator display plus the payment figures it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResponse {
    pub calculator: CalculatorView,
    pub tendered_cents: i64,
    pub change_due_cents: i64,
}

impl From<&RegisterSession> for CalculatorResponse {
    fn from(session: &RegisterSession) -> Self {
        CalculatorResponse {
            calculator: session.calculator().view(),
            tendered_cents: session.tendered().cents(),
            change_due_cents: session.change_due().cents(),
        }
    }
}

/// Gets the calculator display without pressing anything.
pub async fn get_calculator(register: &RegisterState) -> CalculatorResponse {
    debug!("get_calculator command");
    let session = register.lock().await;
    CalculatorResponse::from(&*session)
}

/// Presses one key.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a label that is not a calculator key
pub async fn press_calculator_key(
    register: &RegisterState,
    key: String,
) -> Result<CalculatorResponse, ApiError> {
    debug!(key = %key, "press_calculator_key command");

    let key = Key::parse(&key)?;
    let mut session = register.lock().await;

    if let Some(amount) = session.press(key) {
        info!(tendered = %amount, "Calculator amount applied");
    }

    Ok(CalculatorResponse::from(&*session))
}
