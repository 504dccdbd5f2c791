/// Upbit endpoint catalog.
///
/// Each function turns typed arguments into an [`EndpointDescriptor`].
/// Argument validation happens here, so a rejected call never reaches the
/// network.
use std::fmt;

use crate::config::ApiConfig;
use crate::endpoint::{EndpointDescriptor, QueryParams};
use crate::errors::UpbitError;

pub const ACCOUNTS_PATH: &str = "/v1/accounts";
pub const ORDERS_CHANCE_PATH: &str = "/v1/orders/chance";
pub const MARKET_ALL_PATH: &str = "/v1/market/all";
pub const CANDLES_MINUTES_PATH: &str = "/v1/candles/minutes";
pub const CANDLES_DAYS_PATH: &str = "/v1/candles/days";
pub const CANDLES_WEEKS_PATH: &str = "/v1/candles/weeks";

/// Upper bound on `count` for every candle endpoint.
pub const MAX_CANDLE_COUNT: u32 = 200;

/// Allowed minute-candle units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinuteUnit {
    One,
    Three,
    Five,
    Ten,
    Fifteen,
    Thirty,
    Sixty,
    TwoHundredForty,
}

impl MinuteUnit {
    pub const ALL: [MinuteUnit; 8] = [
        MinuteUnit::One,
        MinuteUnit::Three,
        MinuteUnit::Five,
        MinuteUnit::Ten,
        MinuteUnit::Fifteen,
        MinuteUnit::Thirty,
        MinuteUnit::Sixty,
        MinuteUnit::TwoHundredForty,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            MinuteUnit::One => 1,
            MinuteUnit::Three => 3,
            MinuteUnit::Five => 5,
            MinuteUnit::Ten => 10,
            MinuteUnit::Fifteen => 15,
            MinuteUnit::Thirty => 30,
            MinuteUnit::Sixty => 60,
            MinuteUnit::TwoHundredForty => 240,
        }
    }
}

impl TryFrom<u32> for MinuteUnit {
    type Error = UpbitError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        MinuteUnit::ALL
            .into_iter()
            .find(|unit| unit.minutes() == minutes)
            .ok_or_else(|| {
                UpbitError::InvalidParameter(format!(
                    "minute unit {minutes} is not one of 1, 3, 5, 10, 15, 30, 60, 240"
                ))
            })
    }
}

impl fmt::Display for MinuteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.minutes())
    }
}

/// Parameters shared by the candle endpoints.
///
/// `to` is the exclusive end of the series (`yyyy-MM-dd'T'HH:mm:ss'Z'` or
/// `yyyy-MM-dd HH:mm:ss`); the latest candles are returned when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandleQuery {
    pub market: String,
    pub to: Option<String>,
    pub count: Option<u32>,
    /// Day candles only: currency to convert the close into (e.g. `KRW`).
    pub converting_price_unit: Option<String>,
}

impl CandleQuery {
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            ..Self::default()
        }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn converting_price_unit(mut self, unit: impl Into<String>) -> Self {
        self.converting_price_unit = Some(unit.into());
        self
    }

    /// Validate and encode. A zero count is treated as absent.
    fn params(&self, with_conversion: bool) -> Result<QueryParams, UpbitError> {
        let count = self.count.filter(|c| *c > 0);
        if let Some(c) = count {
            if c > MAX_CANDLE_COUNT {
                return Err(UpbitError::InvalidParameter(format!(
                    "count {c} exceeds the maximum of {MAX_CANDLE_COUNT}"
                )));
            }
        }

        let mut params = QueryParams::new();
        if !self.market.is_empty() {
            params.push("market", self.market.as_str());
        }
        params.push_opt("to", self.to.as_deref().filter(|t| !t.is_empty()));
        params.push_opt("count", count);
        if with_conversion {
            params.push_opt(
                "convertingPriceUnit",
                self.converting_price_unit
                    .as_deref()
                    .filter(|u| !u.is_empty()),
            );
        }
        Ok(params)
    }
}

/// `GET /v1/accounts`
pub fn accounts(config: &ApiConfig) -> EndpointDescriptor {
    EndpointDescriptor::get(config.url(ACCOUNTS_PATH)).authenticated()
}

/// `GET /v1/orders/chance?market=<bid>-<ask>`
pub fn orders_chance(config: &ApiConfig, bid_currency: &str, ask_currency: &str) -> EndpointDescriptor {
    EndpointDescriptor::get(config.url(ORDERS_CHANCE_PATH))
        .query(QueryParams::new().with("market", format!("{bid_currency}-{ask_currency}")))
        .authenticated()
}

/// `GET /v1/market/all?isDetails=<bool>`
pub fn market_all(config: &ApiConfig, is_details: bool) -> EndpointDescriptor {
    EndpointDescriptor::get(config.url(MARKET_ALL_PATH))
        .query(QueryParams::new().with("isDetails", is_details.to_string()))
}

/// `GET /v1/candles/minutes/{unit}`
pub fn candles_minutes(
    config: &ApiConfig,
    unit: u32,
    query: &CandleQuery,
) -> Result<EndpointDescriptor, UpbitError> {
    let unit = MinuteUnit::try_from(unit)?;
    let path = format!("{CANDLES_MINUTES_PATH}/{unit}");
    Ok(EndpointDescriptor::get(config.url(&path)).query(query.params(false)?))
}

/// `GET /v1/candles/days`
pub fn candles_days(config: &ApiConfig, query: &CandleQuery) -> Result<EndpointDescriptor, UpbitError> {
    Ok(EndpointDescriptor::get(config.url(CANDLES_DAYS_PATH)).query(query.params(true)?))
}

/// `GET /v1/candles/weeks`. `converting_price_unit` is not sent.
pub fn candles_weeks(config: &ApiConfig, query: &CandleQuery) -> Result<EndpointDescriptor, UpbitError> {
    Ok(EndpointDescriptor::get(config.url(CANDLES_WEEKS_PATH)).query(query.params(false)?))
}
