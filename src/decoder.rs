/// Classification and decoding of raw outcomes into [`ResultEnvelope`]s.
///
/// Every endpoint goes through [`decode`]. The rules, in order:
///
/// 1. transport failure: error set, no status code
/// 2. status other than 200: the exchange's `{"error":{"name","message"}}`
///    body becomes [`UpbitError::Exchange`]; a body that does not parse yields
///    empty name and message rather than a decode failure
/// 3. status 200: the body is decoded into the endpoint's [`Shape`]; list
///    shapes with no elements become [`UpbitError::EmptyResult`]
///
/// Bodies that fail to parse decode to the target's `Default` value.
use std::any::type_name;
use std::marker::PhantomData;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::UpbitError;
use crate::executor::RawOutcome;

/// How many elements an endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A JSON array; at least one element is expected.
    List,
    /// A JSON array of which only the first element is returned.
    First,
    /// A single JSON object.
    Object,
}

/// Wire shape of an endpoint's payload and what the caller receives.
pub trait Shape {
    const CARDINALITY: Cardinality;
    /// What the body is parsed into.
    type Wire: DeserializeOwned + Default;
    /// What the envelope carries.
    type Output;

    /// `None` when the payload has no element to return.
    fn extract(wire: Self::Wire) -> Option<Self::Output>;
}

/// A JSON array returned as a whole.
pub struct List<T>(PhantomData<T>);

/// A JSON array of which the caller wants the first element.
pub struct First<T>(PhantomData<T>);

/// A single JSON object.
pub struct Object<T>(PhantomData<T>);

impl<T: DeserializeOwned> Shape for List<T> {
    const CARDINALITY: Cardinality = Cardinality::List;
    type Wire = Vec<T>;
    type Output = Vec<T>;

    fn extract(wire: Vec<T>) -> Option<Vec<T>> {
        if wire.is_empty() {
            None
        } else {
            Some(wire)
        }
    }
}

impl<T: DeserializeOwned> Shape for First<T> {
    const CARDINALITY: Cardinality = Cardinality::First;
    type Wire = Vec<T>;
    type Output = T;

    fn extract(wire: Vec<T>) -> Option<T> {
        wire.into_iter().next()
    }
}

impl<T: DeserializeOwned + Default> Shape for Object<T> {
    const CARDINALITY: Cardinality = Cardinality::Object;
    type Wire = T;
    type Output = T;

    fn extract(wire: T) -> Option<T> {
        Some(wire)
    }
}

/// Uniform return value of every endpoint call.
///
/// `error` is set exactly when `response` is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope<T> {
    response: Option<T>,
    status_code: Option<u16>,
    error: Option<UpbitError>,
}

impl<T> ResultEnvelope<T> {
    pub fn success(response: T, status_code: u16) -> Self {
        Self {
            response: Some(response),
            status_code: Some(status_code),
            error: None,
        }
    }

    pub fn failure(error: UpbitError, status_code: Option<u16>) -> Self {
        Self {
            response: None,
            status_code,
            error: Some(error),
        }
    }

    pub fn response(&self) -> Option<&T> {
        self.response.as_ref()
    }

    /// HTTP status, `None` when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn error(&self) -> Option<&UpbitError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, UpbitError> {
        match (self.response, self.error) {
            (Some(response), None) => Ok(response),
            (_, Some(error)) => Err(error),
            (None, None) => Err(UpbitError::EmptyResult),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        ResultEnvelope {
            response: self.response.map(f),
            status_code: self.status_code,
            error: self.error,
        }
    }
}

/// Error body sent by the exchange with non-200 responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExchangeErrorBody {
    #[serde(default)]
    pub error: ExchangeErrorDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExchangeErrorDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Parse `body`, falling back to `T::default()` when it does not parse.
fn decode_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(
                "decoder.decode_lenient fallback_to_default target_type={} body_len={} error={}",
                type_name::<T>(),
                body.len(),
                e
            );
            T::default()
        }
    }
}

fn exchange_error(status: u16, body: &[u8]) -> UpbitError {
    let ExchangeErrorBody { error } = decode_lenient(body);
    UpbitError::Exchange {
        status,
        name: error.name,
        message: error.message,
    }
}

/// Classify `outcome` and decode it into `S`'s output.
pub fn decode<S: Shape>(outcome: RawOutcome) -> ResultEnvelope<S::Output> {
    let (status, body) = match outcome {
        RawOutcome::Transport(error) => {
            debug!("decoder.decode transport_error error={}", error);
            return ResultEnvelope::failure(error, None);
        }
        RawOutcome::Response { status, body } => (status, body),
    };

    if status != 200 {
        let error = exchange_error(status, &body);
        debug!("decoder.decode exchange_error status={} error={}", status, error);
        return ResultEnvelope::failure(error, Some(status));
    }

    let wire: S::Wire = decode_lenient(&body);
    match S::extract(wire) {
        Some(response) => {
            debug!(
                "decoder.decode ok cardinality={:?} target_type={}",
                S::CARDINALITY,
                type_name::<S::Output>()
            );
            ResultEnvelope::success(response, status)
        }
        None => {
            debug!("decoder.decode empty_result cardinality={:?}", S::CARDINALITY);
            ResultEnvelope::failure(UpbitError::EmptyResult, Some(status))
        }
    }
}
