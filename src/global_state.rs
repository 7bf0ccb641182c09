use crate::application::DashboardState;
use crate::config::DashboardConfig;
use leptos::*;
use once_cell::sync::OnceCell;

pub struct Globals {
    pub dashboard: RwSignal<DashboardState>,
    pub is_polling: RwSignal<bool>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        dashboard: create_rw_signal(DashboardState::initial(&DashboardConfig::default(), 0)),
        is_polling: create_rw_signal(false),
    })
}

crate::global_signals! {
    pub dashboard_state => dashboard: DashboardState,
    pub polling_flag => is_polling: bool,
}
