use crate::config::DashboardConfig;
use crate::domain::{
    dashboard::{
        BotApi, DEFAULT_CANDLE_LIMIT, DEFAULT_SNAPSHOT_LIMIT, DEFAULT_TRADE_LIMIT, Mode,
        StartRequest, Symbol, TimeInterval,
    },
    errors::{ApiError, ApiResult},
    logging::{LogComponent, get_logger},
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One operation of the bot service: route, query and failure label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub operation: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(operation: &'static str, method: Method, path: &'static str) -> Self {
        Self { operation, method, path, query: Vec::new() }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn status() -> Self {
        Self::new("status", Method::Get, "/api/bot/status")
    }

    pub fn candles(symbol: &Symbol, interval: TimeInterval, limit: Option<u32>) -> Self {
        Self::new("candles", Method::Get, "/api/market/candles")
            .param("symbol", symbol)
            .param("interval", interval.as_query())
            .param("limit", limit.unwrap_or(DEFAULT_CANDLE_LIMIT))
    }

    pub fn trades(mode: Mode, symbol: &Symbol, limit: Option<u32>) -> Self {
        Self::new("trades", Method::Get, "/api/trades")
            .param("mode", mode.as_query())
            .param("symbol", symbol)
            .param("limit", limit.unwrap_or(DEFAULT_TRADE_LIMIT))
    }

    pub fn snapshots(mode: Mode, symbol: &Symbol, limit: Option<u32>) -> Self {
        Self::new("snapshots", Method::Get, "/api/portfolio/snapshots")
            .param("mode", mode.as_query())
            .param("symbol", symbol)
            .param("limit", limit.unwrap_or(DEFAULT_SNAPSHOT_LIMIT))
    }

    pub fn start() -> Self {
        Self::new("start", Method::Post, "/api/bot/start")
    }

    pub fn pause() -> Self {
        Self::new("pause", Method::Post, "/api/bot/pause")
    }

    pub fn reset(mode: Mode, symbol: &Symbol) -> Self {
        Self::new("reset", Method::Post, "/api/bot/reset")
            .param("mode", mode.as_query())
            .param("symbol", symbol)
    }

    /// Base URL joined with the path; the query is attached by the request
    /// builder, which takes care of encoding
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// HTTP client for the bot service, built on gloo-net
#[derive(Debug, Clone)]
pub struct BotApiClient {
    base_url: String,
}

impl BotApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    fn builder(&self, endpoint: &Endpoint) -> RequestBuilder {
        let url = endpoint.url(&self.base_url);
        get_logger().debug(
            LogComponent::Infrastructure("BotApi"),
            &format!("🌐 {:?} {} {:?}", endpoint.method, url, endpoint.query),
        );
        let builder = match endpoint.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        };
        builder.query(endpoint.query.iter().map(|(key, value)| (*key, value.as_str())))
    }

    async fn read(&self, endpoint: Endpoint) -> ApiResult<Value> {
        let response = transport(self.builder(&endpoint).send().await)?;
        if !response.ok() {
            return Err(failed(&endpoint, &response));
        }
        response.json::<Value>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn command(&self, endpoint: Endpoint) -> ApiResult<()> {
        let response = transport(self.builder(&endpoint).send().await)?;
        if !response.ok() {
            return Err(failed(&endpoint, &response));
        }
        Ok(())
    }
}

fn transport(result: Result<Response, gloo_net::Error>) -> ApiResult<Response> {
    result.map_err(|e| {
        get_logger().error(
            LogComponent::Infrastructure("BotApi"),
            &format!("❌ Request failed: {e}"),
        );
        ApiError::Transport(e.to_string())
    })
}

fn failed(endpoint: &Endpoint, response: &Response) -> ApiError {
    get_logger().warn(
        LogComponent::Infrastructure("BotApi"),
        &format!("⚠️ {} returned HTTP {}", endpoint.operation, response.status()),
    );
    ApiError::status(endpoint.operation, response.status())
}

impl BotApi for BotApiClient {
    async fn status(&self) -> ApiResult<Value> {
        self.read(Endpoint::status()).await
    }

    async fn candles(&self, symbol: &Symbol, interval: TimeInterval, limit: Option<u32>) -> ApiResult<Value> {
        self.read(Endpoint::candles(symbol, interval, limit)).await
    }

    async fn trades(&self, mode: Mode, symbol: &Symbol, limit: Option<u32>) -> ApiResult<Value> {
        self.read(Endpoint::trades(mode, symbol, limit)).await
    }

    async fn snapshots(&self, mode: Mode, symbol: &Symbol, limit: Option<u32>) -> ApiResult<Value> {
        self.read(Endpoint::snapshots(mode, symbol, limit)).await
    }

    /// A rejected start reports the service's response body
    async fn start(&self, request: &StartRequest) -> ApiResult<()> {
        let endpoint = Endpoint::start();
        let request = self
            .builder(&endpoint)
            .json(request)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let response = transport(request.send().await)?;
        if response.ok() {
            return Ok(());
        }
        Err(start_rejection(endpoint.operation, response.status(), response.text().await))
    }

    async fn pause(&self) -> ApiResult<()> {
        self.command(Endpoint::pause()).await
    }

    async fn reset(&self, mode: Mode, symbol: &Symbol) -> ApiResult<()> {
        self.command(Endpoint::reset(mode, symbol)).await
    }
}

/// Error for a non-success start: the response body verbatim, or the
/// fixed operation message when the body is blank or could not be read
fn start_rejection<E: std::fmt::Display>(
    operation: &'static str,
    code: u16,
    body: Result<String, E>,
) -> ApiError {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            get_logger().warn(
                LogComponent::Infrastructure("BotApi"),
                &format!("⚠️ Could not read start rejection body: {e}"),
            );
            String::new()
        }
    };
    get_logger().warn(
        LogComponent::Infrastructure("BotApi"),
        &format!("⚠️ start rejected with HTTP {code}: {body}"),
    );
    if body.trim().is_empty() {
        ApiError::status(operation, code)
    } else {
        ApiError::Rejected(body)
    }
}
