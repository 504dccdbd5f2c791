/// Endpoint descriptors consumed by the request pipeline.
///
/// A descriptor is pure data: where to send the request, with which query
/// parameters, and whether it must be signed. Adding an endpoint never adds
/// control flow.
use url::form_urlencoded;

/// HTTP method of an endpoint. The Upbit quotation and account endpoints used
/// here are all `GET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
        }
    }
}

/// Query parameters in caller-determined order.
///
/// [`QueryParams::encode`] is the single source of the query string: the
/// signer hashes it and the executor sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Push only when a value is present.
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(v) = value {
            self.push(key, v.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` serialization, pairs in insertion order.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

/// Everything the pipeline needs to perform one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub method: Method,
    pub base_url: String,
    pub query: QueryParams,
    pub requires_auth: bool,
}

impl EndpointDescriptor {
    pub fn get(base_url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            base_url: base_url.into(),
            query: QueryParams::new(),
            requires_auth: false,
        }
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// The exact URL put on the wire.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, self.query.encode())
        }
    }
}
