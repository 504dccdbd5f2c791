/// REST API client for Upbit.
///
/// Every endpoint runs the same pipeline: build a descriptor from the
/// catalog, sign it when the endpoint requires auth, execute it, and decode
/// the outcome into a [`ResultEnvelope`].
use std::sync::Arc;

use log::debug;

use crate::auth::{sign, AuthToken, Credentials};
use crate::catalog::{self, CandleQuery};
use crate::config::ApiConfig;
use crate::decoder::{decode, First, List, Object, ResultEnvelope, Shape};
use crate::endpoint::EndpointDescriptor;
use crate::errors::UpbitError;
use crate::executor::RequestExecutor;
use crate::models::*;

/// Low-level REST API client for Upbit.
///
/// Cheap to clone and safe to share between tasks: it holds no per-request
/// state, and tokens are signed per call and handed straight to the executor.
#[derive(Debug, Clone)]
pub struct UpbitApi {
    executor: RequestExecutor,
    config: ApiConfig,
    credentials: Option<Arc<Credentials>>,
}

impl UpbitApi {
    /// Create a client for the production host, public endpoints only.
    pub fn new() -> Result<Self, UpbitError> {
        Self::with_config(ApiConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: ApiConfig) -> Result<Self, UpbitError> {
        let executor = RequestExecutor::new(&config)?;
        debug!("api.new api_base={}", config.api_base);
        Ok(Self {
            executor,
            config,
            credentials: None,
        })
    }

    /// Attach credentials, enabling the authenticated endpoints.
    pub fn with_credentials(mut self, credentials: impl Into<Arc<Credentials>>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Sign `descriptor` if it requires auth.
    ///
    /// Fails with [`UpbitError::Precondition`] when the endpoint requires auth
    /// and no credentials are attached.
    pub fn authorize(&self, descriptor: &EndpointDescriptor) -> Result<Option<AuthToken>, UpbitError> {
        if !descriptor.requires_auth {
            return Ok(None);
        }
        let credentials = self.credentials.as_deref().ok_or_else(|| {
            UpbitError::Precondition(format!(
                "{} requires credentials; attach them with UpbitApi::with_credentials",
                descriptor.base_url
            ))
        })?;
        sign(credentials, Some(&descriptor.query)).map(Some)
    }

    /// Run the full pipeline for one descriptor.
    pub async fn call<S: Shape>(&self, descriptor: &EndpointDescriptor) -> ResultEnvelope<S::Output> {
        debug!(
            "api.call url={} requires_auth={} cardinality={:?}",
            descriptor.base_url,
            descriptor.requires_auth,
            S::CARDINALITY
        );
        let token = match self.authorize(descriptor) {
            Ok(token) => token,
            Err(e) => {
                debug!("api.call rejected_before_dispatch error={}", e);
                return ResultEnvelope::failure(e, None);
            }
        };
        let outcome = self.executor.execute(descriptor, token.as_ref()).await;
        decode::<S>(outcome)
    }

    /// Like [`call`](Self::call), for descriptors that failed validation.
    async fn call_checked<S: Shape>(
        &self,
        descriptor: Result<EndpointDescriptor, UpbitError>,
    ) -> ResultEnvelope<S::Output> {
        match descriptor {
            Ok(descriptor) => self.call::<S>(&descriptor).await,
            Err(e) => {
                debug!("api.call invalid_parameters error={}", e);
                ResultEnvelope::failure(e, None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Exchange API (authenticated)
    // -----------------------------------------------------------------------

    /// GET /v1/accounts - Assets held by the account.
    ///
    /// Decoded like every other list endpoint: an account holding no assets
    /// at all comes back as [`UpbitError::EmptyResult`] with status 200, not
    /// as an empty `Vec`. Check [`UpbitError::is_empty_result`] to tell the
    /// two apart from real failures.
    pub async fn accounts(&self) -> ResultEnvelope<Vec<Account>> {
        debug!("api.accounts");
        let descriptor = catalog::accounts(&self.config);
        self.call::<List<Account>>(&descriptor).await
    }

    /// GET /v1/orders/chance - Order constraints for the `<bid>-<ask>` market.
    pub async fn orders_chance(
        &self,
        bid_currency: &str,
        ask_currency: &str,
    ) -> ResultEnvelope<OrdersChance> {
        debug!(
            "api.orders_chance bid_currency={} ask_currency={}",
            bid_currency, ask_currency
        );
        let descriptor = catalog::orders_chance(&self.config, bid_currency, ask_currency);
        self.call::<Object<OrdersChance>>(&descriptor).await
    }

    // -----------------------------------------------------------------------
    // Quotation API (public)
    // -----------------------------------------------------------------------

    /// GET /v1/market/all - Tradable markets.
    pub async fn market_all(&self, is_details: bool) -> ResultEnvelope<Vec<MarketInfo>> {
        debug!("api.market_all is_details={}", is_details);
        let descriptor = catalog::market_all(&self.config, is_details);
        self.call::<List<MarketInfo>>(&descriptor).await
    }

    /// GET /v1/candles/minutes/{unit} - Minute candles.
    ///
    /// `unit` must be one of 1, 3, 5, 10, 15, 30, 60 or 240.
    pub async fn candles_minutes(
        &self,
        unit: u32,
        query: &CandleQuery,
    ) -> ResultEnvelope<Vec<MinuteCandle>> {
        debug!(
            "api.candles_minutes unit={} market={} to={:?} count={:?}",
            unit, query.market, query.to, query.count
        );
        let descriptor = catalog::candles_minutes(&self.config, unit, query);
        self.call_checked::<List<MinuteCandle>>(descriptor).await
    }

    /// GET /v1/candles/days - The most recent day candle of the series.
    pub async fn candles_days(&self, query: &CandleQuery) -> ResultEnvelope<DayCandle> {
        debug!(
            "api.candles_days market={} to={:?} count={:?} converting_price_unit={:?}",
            query.market, query.to, query.count, query.converting_price_unit
        );
        let descriptor = catalog::candles_days(&self.config, query);
        self.call_checked::<First<DayCandle>>(descriptor).await
    }

    /// GET /v1/candles/weeks - Week candles.
    pub async fn candles_weeks(&self, query: &CandleQuery) -> ResultEnvelope<Vec<WeekCandle>> {
        debug!(
            "api.candles_weeks market={} to={:?} count={:?}",
            query.market, query.to, query.count
        );
        let descriptor = catalog::candles_weeks(&self.config, query);
        self.call_checked::<List<WeekCandle>>(descriptor).await
    }
}
