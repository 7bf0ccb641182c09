use crate::config::DashboardConfig;
use crate::domain::dashboard::{DashboardData, DashboardView, Mode, StartRequest, Symbol, TimeInterval};
use crate::time_utils::iso_utc;

/// Parameters that select what the dashboard polls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub mode: Mode,
    pub symbol: Symbol,
    pub interval: TimeInterval,
}

/// Inputs of the start command; editing them never triggers a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct StartInputs {
    pub initial_balance: f64,
    pub risk_pct: f64,
    pub from_iso: String,
    pub to_iso: String,
}

/// Everything the controller owns
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub params: QueryParams,
    pub start_inputs: StartInputs,
    pub data: DashboardData,
    pub error: Option<String>,
}

impl DashboardState {
    /// Initial state: configured defaults, training window ending at `now_ms`
    pub fn initial(config: &DashboardConfig, now_ms: i64) -> Self {
        let window_ms = config.training_window().as_millis() as i64;
        Self {
            params: QueryParams {
                mode: config.default_mode,
                symbol: config.default_symbol.clone(),
                interval: config.default_interval,
            },
            start_inputs: StartInputs {
                initial_balance: config.initial_balance,
                risk_pct: config.risk_pct,
                from_iso: iso_utc(now_ms - window_ms),
                to_iso: iso_utc(now_ms),
            },
            data: DashboardData::default(),
            error: None,
        }
    }

    pub fn start_request(&self) -> StartRequest {
        StartRequest::new(
            self.params.mode,
            self.params.symbol.clone(),
            self.params.interval,
            (self.start_inputs.from_iso.as_str(), self.start_inputs.to_iso.as_str()),
            self.start_inputs.initial_balance,
            self.start_inputs.risk_pct,
        )
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::derive(&self.data)
    }
}
