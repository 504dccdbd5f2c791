/// Data models for Upbit API payloads.
///
/// Every struct decodes permissively: missing fields and `null`s take their
/// default value, field by field, so one bad field never discards a payload.
/// Numeric strings (`NumberString` in the Upbit reference) stay `String` to
/// avoid precision loss.
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Deserialize a value that may be a JSON string or number, storing it as a string.
/// `null` becomes the empty string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(v) => v.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// One asset held by the account. `GET /v1/accounts`
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde_as(as = "DefaultOnNull")]
    pub currency: String,
    /// Orderable amount.
    #[serde_as(as = "DefaultOnNull")]
    pub balance: String,
    /// Amount tied up in open orders.
    #[serde_as(as = "DefaultOnNull")]
    pub locked: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avg_buy_price: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avg_buy_price_modified: bool,
    /// Currency the average buy price is quoted in.
    #[serde_as(as = "DefaultOnNull")]
    pub unit_currency: String,
}

// ---------------------------------------------------------------------------
// Order eligibility
// ---------------------------------------------------------------------------

/// Order constraints and account state for one market. `GET /v1/orders/chance`
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersChance {
    #[serde_as(as = "DefaultOnNull")]
    pub bid_fee: String,
    #[serde_as(as = "DefaultOnNull")]
    pub ask_fee: String,
    #[serde_as(as = "DefaultOnNull")]
    pub maker_bid_fee: String,
    #[serde_as(as = "DefaultOnNull")]
    pub maker_ask_fee: String,
    #[serde_as(as = "DefaultOnNull")]
    pub market: OrderMarket,
    #[serde_as(as = "DefaultOnNull")]
    pub bid_account: OrderAccount,
    #[serde_as(as = "DefaultOnNull")]
    pub ask_account: OrderAccount,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderMarket {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub order_types: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub order_sides: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub bid: OrderConstraint,
    #[serde_as(as = "DefaultOnNull")]
    pub ask: OrderConstraint,
    /// Maximum order total.
    #[serde(deserialize_with = "string_or_number")]
    pub max_total: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
}

/// Buy- or sell-side order constraint.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConstraint {
    #[serde_as(as = "DefaultOnNull")]
    pub currency: String,
    pub price_unit: Option<String>,
    /// Minimum order total.
    #[serde(deserialize_with = "string_or_number")]
    pub min_total: String,
}

/// State of the account used on one side of an order.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderAccount {
    #[serde_as(as = "DefaultOnNull")]
    pub currency: String,
    #[serde_as(as = "DefaultOnNull")]
    pub balance: String,
    #[serde_as(as = "DefaultOnNull")]
    pub locked: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avg_buy_price: String,
    #[serde_as(as = "DefaultOnNull")]
    pub avg_buy_price_modified: bool,
    #[serde_as(as = "DefaultOnNull")]
    pub unit_currency: String,
}

// ---------------------------------------------------------------------------
// Market catalog
// ---------------------------------------------------------------------------

/// A tradable market. `GET /v1/market/all`
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketInfo {
    /// Market code, e.g. `KRW-BTC`.
    #[serde_as(as = "DefaultOnNull")]
    pub market: String,
    #[serde_as(as = "DefaultOnNull")]
    pub korean_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub english_name: String,
    /// `NONE` or `CAUTION`; only present when details were requested.
    pub market_warning: Option<String>,
}

impl MarketInfo {
    pub fn is_caution(&self) -> bool {
        self.market_warning.as_deref() == Some("CAUTION")
    }
}

// ---------------------------------------------------------------------------
// Candles
// ---------------------------------------------------------------------------

/// `GET /v1/candles/minutes/{unit}`
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinuteCandle {
    #[serde_as(as = "DefaultOnNull")]
    pub market: String,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_date_time_utc: String,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_date_time_kst: String,
    #[serde_as(as = "DefaultOnNull")]
    pub opening_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub high_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub low_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub trade_price: f64,
    /// Time of the last tick in the candle, milliseconds.
    #[serde_as(as = "DefaultOnNull")]
    pub timestamp: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_acc_trade_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_acc_trade_volume: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub unit: u32,
}

/// `GET /v1/candles/days`
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCandle {
    #[serde_as(as = "DefaultOnNull")]
    pub market: String,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_date_time_utc: String,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_date_time_kst: String,
    #[serde_as(as = "DefaultOnNull")]
    pub opening_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub high_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub low_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub trade_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub timestamp: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_acc_trade_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_acc_trade_volume: f64,
    /// Previous close at 00:00 UTC.
    #[serde_as(as = "DefaultOnNull")]
    pub prev_closing_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub change_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub change_rate: f64,
    /// Only present when `convertingPriceUnit` was requested.
    pub converted_trade_price: Option<f64>,
}

/// `GET /v1/candles/weeks`
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekCandle {
    #[serde_as(as = "DefaultOnNull")]
    pub market: String,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_date_time_utc: String,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_date_time_kst: String,
    #[serde_as(as = "DefaultOnNull")]
    pub opening_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub high_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub low_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub trade_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub timestamp: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_acc_trade_price: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub candle_acc_trade_volume: f64,
    #[serde_as(as = "DefaultOnNull")]
    pub first_day_of_period: String,
}
