//! # Command Bridge
//!
//! Line-delimited JSON between the front end and the register commands.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin (one request per line)                                           │
//! │  {"id": 1, "cmd": "add_to_cart", "args": {"productId": 201}}            │
//! │  {"id": 2, "cmd": "checkout", "args": {"tenderedCents": 10000}}         │
//! │                                                                         │
//! │  stdout (one response per line, same order)                             │
//! │  {"id": 1, "ok": true, "data": {"lines": [...], "totals": {...}}}       │
//! │  {"id": 2, "ok": false, "error": {"code": "EMPTY_CART", ...}}           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `id` is optional and echoed back untouched. `args` may be omitted for
//! commands without arguments. Requests are handled one at a time, so the
//! responses come back in request order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::commands::{calculator, cart, config, product, sale};
use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, DbState, RegisterState};
use till_core::{ProductDraft, QuantityChange};
use till_db::{Database, DbResult};

/// Every state the commands can ask for.
#[derive(Debug)]
pub struct ManagedState {
    pub db: DbState,
    pub register: RegisterState,
    pub config: ConfigState,
}

impl ManagedState {
    /// Restores the register from `db` and bundles it with the config.
    pub async fn open(db: Database, config: ConfigState) -> DbResult<Self> {
        let register = RegisterState::load(&db).await?;
        Ok(ManagedState {
            db: DbState::new(db),
            register,
            config,
        })
    }
}

/// One command call.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    pub cmd: String,
    #[serde(default)]
    pub args: Value,
}

/// Reply to one [`Request`].
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn from_result(id: Option<Value>, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response {
                id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Response {
                id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductIdArgs {
    product_id: u64,
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct CategoryArgs {
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveProductArgs {
    #[serde(default)]
    id: Option<u64>,
    draft: ProductDraft,
}

#[derive(Debug, Deserialize)]
struct ImportArgs {
    json: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeQuantityArgs {
    product_id: u64,
    change: QuantityChange,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TenderedArgs {
    amount_cents: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutArgs {
    #[serde(default)]
    tendered_cents: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LimitArgs {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct KeyArgs {
    key: String,
}

fn parse_args<T: DeserializeOwned>(cmd: &str, args: Value) -> Result<T, ApiError> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(args)
        .map_err(|e| ApiError::validation(format!("Invalid arguments for {}: {}", cmd, e)))
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs one command by name.
///
/// ## Errors
/// - `UNKNOWN_COMMAND` for a name not listed below
/// - `VALIDATION_ERROR` for missing or mistyped arguments
/// - whatever the command itself returns
pub async fn dispatch(state: &ManagedState, cmd: &str, args: Value) -> Result<Value, ApiError> {
    let db = &state.db;
    let register = &state.register;
    let config_state = &state.config;

    match cmd {
        // Product commands
        "list_products" => {
            let a: CategoryArgs = parse_args(cmd, args)?;
            to_data(product::list_products(register, a.category).await)
        }
        "get_product" => {
            let a: IdArgs = parse_args(cmd, args)?;
            to_data(product::get_product(register, a.id).await?)
        }
        "list_categories" => to_data(product::list_categories(register).await),
        "save_product" => {
            let a: SaveProductArgs = parse_args(cmd, args)?;
            to_data(product::save_product(db, register, a.id, a.draft).await?)
        }
        "delete_product" => {
            let a: IdArgs = parse_args(cmd, args)?;
            to_data(product::delete_product(db, register, a.id).await?)
        }
        "import_products" => {
            let a: ImportArgs = parse_args(cmd, args)?;
            to_data(product::import_products(db, register, a.json).await?)
        }
        "export_products" => to_data(product::export_products(register).await?),

        // Cart commands
        "get_cart" => to_data(cart::get_cart(register).await),
        "add_to_cart" => {
            let a: ProductIdArgs = parse_args(cmd, args)?;
            to_data(cart::add_to_cart(register, a.product_id).await?)
        }
        "change_quantity" => {
            let a: ChangeQuantityArgs = parse_args(cmd, args)?;
            to_data(cart::change_quantity(register, a.product_id, a.change).await?)
        }
        "remove_from_cart" => {
            let a: ProductIdArgs = parse_args(cmd, args)?;
            to_data(cart::remove_from_cart(register, a.product_id).await)
        }
        "clear_cart" => to_data(cart::clear_cart(register).await),
        "set_tendered" => {
            let a: TenderedArgs = parse_args(cmd, args)?;
            to_data(cart::set_tendered(register, a.amount_cents).await?)
        }

        // Calculator commands
        "get_calculator" => to_data(calculator::get_calculator(register).await),
        "press_calculator_key" => {
            let a: KeyArgs = parse_args(cmd, args)?;
            to_data(calculator::press_calculator_key(register, a.key).await?)
        }

        // Sale commands
        "checkout" => {
            let a: CheckoutArgs = parse_args(cmd, args)?;
            to_data(sale::checkout(db, register, config_state, a.tendered_cents).await?)
        }
        "list_transactions" => {
            let a: LimitArgs = parse_args(cmd, args)?;
            to_data(sale::list_transactions(register, a.limit).await)
        }
        "get_transaction" => {
            let a: IdArgs = parse_args(cmd, args)?;
            to_data(sale::get_transaction(register, a.id).await?)
        }
        "reprint_receipt" => {
            let a: IdArgs = parse_args(cmd, args)?;
            to_data(sale::reprint_receipt(register, config_state, a.id).await?)
        }

        // Config commands
        "get_config" => to_data(config::get_config(config_state)),

        _ => Err(ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command: {}", cmd),
        )),
    }
}

/// Parses and runs one request line.
pub async fn handle_line(state: &ManagedState, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            let result = dispatch(state, &request.cmd, request.args).await;
            if let Err(e) = &result {
                debug!(cmd = %request.cmd, error = %e, "Command failed");
            }
            Response::from_result(request.id, result)
        }
        Err(e) => {
            warn!("Malformed request: {}", e);
            Response::from_result(
                None,
                Err(ApiError::validation(format!("Malformed request: {}", e))),
            )
        }
    }
}

/// Serves requests from `reader` until end of input.
///
/// Blank lines are skipped. Each response is flushed before the next
/// request is read.
pub async fn serve<R, W>(state: &ManagedState, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_line(state, line).await;
        let mut encoded = serde_json::to_string(&response).map_err(std::io::Error::other)?;
        encoded.push('\n');

        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    info!(requests = handled, "Command stream closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use till_db::DbConfig;
    use tokio::io::BufReader;

    async fn state() -> ManagedState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ManagedState::open(db, ConfigState::default()).await.unwrap()
    }

    async fn call(state: &ManagedState, request: Value) -> Value {
        let response = handle_line(state, &request.to_string()).await;
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_full_sale_over_the_wire() {
        let state = state().await;

        for _ in 0..3 {
            let r = call(&state, json!({"cmd": "add_to_cart", "args": {"productId": 201}})).await;
            assert_eq!(r["ok"], true);
        }

        for key in ["2", "0", "0", "apply"] {
            call(&state, json!({"cmd": "press_calculator_key", "args": {"key": key}})).await;
        }

        let r = call(&state, json!({"id": "sale-1", "cmd": "checkout"})).await;
        assert_eq!(r["id"], "sale-1");
        assert_eq!(r["ok"], true);
        assert_eq!(r["data"]["transaction"]["receivable"], 195.0);
        assert_eq!(r["data"]["transaction"]["tendered"], 200.0);
        assert_eq!(r["data"]["transaction"]["change"], 5.0);
        assert_eq!(r["data"]["transaction"]["totalUnits"], 3);

        let r = call(&state, json!({"cmd": "list_transactions", "args": {"limit": 10}})).await;
        assert_eq!(r["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_on_the_wire() {
        let state = state().await;

        let r = call(&state, json!({"id": 3, "cmd": "checkout", "args": {"tenderedCents": 100}})).await;
        assert_eq!(r["id"], 3);
        assert_eq!(r["ok"], false);
        assert_eq!(r["error"]["code"], "EMPTY_CART");
        assert!(r.get("data").is_none());

        let r = call(&state, json!({"cmd": "fly"})).await;
        assert_eq!(r["error"]["code"], "UNKNOWN_COMMAND");

        let r = call(&state, json!({"cmd": "add_to_cart", "args": {"productId": "x"}})).await;
        assert_eq!(r["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_save_product_over_the_wire() {
        let state = state().await;

        let r = call(
            &state,
            json!({
                "cmd": "save_product",
                "args": {"draft": {"name": "Scone", "price": 45, "category": "Snacks", "stock": 12}}
            }),
        )
        .await;
        assert_eq!(r["ok"], true);
        assert_eq!(r["data"]["id"], 1001);
        assert_eq!(r["data"]["stock"], 12);

        let r = call(&state, json!({"cmd": "get_product", "args": {"id": 1001}})).await;
        assert_eq!(r["data"]["name"], "Scone");
    }

    #[tokio::test]
    async fn test_serve_skips_blank_lines_and_bad_json() {
        let state = state().await;
        let input = "{\"id\":1,\"cmd\":\"get_config\"}\n\n not json\n{\"id\":2,\"cmd\":\"get_cart\"}\n";
        let mut output = Vec::new();

        serve(&state, BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        let responses: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["data"]["storeName"], "Till POS");
        assert_eq!(responses[1]["ok"], false);
        assert_eq!(responses[1]["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(responses[2]["id"], 2);
        assert_eq!(responses[2]["data"]["totals"]["receivableCents"], 0);
    }
}
