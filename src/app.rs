use leptos::*;
use std::str::FromStr;

use crate::{
    application::{Command, DashboardController},
    config::DashboardConfig,
    domain::{
        dashboard::{DashboardView, EquityPoint, Mode, Symbol, TimeInterval},
        logging::{LogComponent, get_logger},
    },
    global_state::{dashboard_state, polling_flag},
    infrastructure::{BotApiClient, BrowserRuntime, ChronoTimeProvider},
    presentation::geometry::{Viewport, equity_points, marker_dots, polyline, price_points},
};

type Controller = DashboardController<BotApiClient, BrowserRuntime>;

/// Root component: owns the controller for the lifetime of the page
#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    let controller: Controller = DashboardController::new(
        BotApiClient::from_config(&config),
        BrowserRuntime,
        config,
        ChronoTimeProvider::now_millis(),
    );

    let state = dashboard_state();
    state.set(controller.state());
    controller.subscribe(move |snapshot| state.set(snapshot.clone()));
    controller.mount();
    polling_flag().set(controller.is_polling());
    get_logger().info(
        LogComponent::Presentation("App"),
        &format!("🚀 Dashboard mounted against {}", controller.config().api_base_url),
    );

    {
        let controller = controller.clone();
        on_cleanup(move || {
            controller.unmount();
            polling_flag().set(false);
        });
    }

    let derived = create_memo(move |_| state.with(|s| s.view()));

    view! {
        <style>
            {r#"
            .dashboard {
                font-family: 'SF Pro Display', -apple-system, BlinkMacSystemFont, sans-serif;
                background: #1f2a38;
                min-height: 100vh;
                padding: 20px;
                color: #ecf0f1;
            }
            .header { display: flex; align-items: baseline; gap: 16px; }
            .badge { padding: 2px 10px; border-radius: 10px; font-size: 12px; background: #34495e; }
            .badge.running { background: #27ae60; }
            .controls { display: flex; flex-wrap: wrap; gap: 12px; align-items: end; margin: 16px 0; }
            .controls label { display: flex; flex-direction: column; font-size: 12px; gap: 4px; }
            .controls button { padding: 6px 16px; border: none; border-radius: 6px; cursor: pointer; }
            .error { background: #c0392b; padding: 8px 12px; border-radius: 6px; margin-bottom: 12px; }
            .panel { background: #2c3e50; border-radius: 10px; padding: 12px 16px; margin-bottom: 16px; }
            .summary { display: flex; gap: 32px; }
            .figure-value { font-size: 22px; font-weight: 600; }
            .figure-label { font-size: 12px; opacity: 0.7; }
            .chart { width: 100%; height: 260px; }
            .axis-label { fill: #95a5a6; font-size: 11px; }
            table { width: 100%; border-collapse: collapse; font-size: 13px; }
            th, td { text-align: right; padding: 4px 8px; border-bottom: 1px solid #34495e; }
            td.side-BUY { color: #2ecc71; }
            td.side-SELL { color: #e74c3c; }
            .empty { opacity: 0.6; font-style: italic; }
            "#}
        </style>
        <div class="dashboard">
            <Header />
            <Controls controller=controller />
            <ErrorBanner />
            <SummaryCard derived=derived />
            <EquityChart derived=derived />
            <PriceChart derived=derived />
            <TradeTable derived=derived />
        </div>
    }
}

#[component]
fn Header() -> impl IntoView {
    let state = dashboard_state();
    let polling = polling_flag();
    let running = move || {
        state.with(|s| s.data.status.as_ref().map(|status| status.running()).unwrap_or(false))
    };

    view! {
        <div class="header">
            <h1>"🤖 Trading Bot Dashboard"</h1>
            <span class="badge" class:running=running>
                {move || if running() { "🟢 RUNNING" } else { "⏸️ IDLE" }}
            </span>
            <span class="badge">
                {move || if polling.get() { "polling" } else { "stopped" }}
            </span>
            <span class="badge">
                {move || state.with(|s| format!("{} • {} • {}", s.params.mode, s.params.symbol, s.params.interval))}
            </span>
        </div>
    }
}

/// Query selectors, start inputs and the command buttons
#[component]
fn Controls(controller: Controller) -> impl IntoView {
    let state = dashboard_state();
    let config = controller.config().clone();

    let on_mode = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            if let Ok(mode) = Mode::from_str(&event_target_value(&ev)) {
                controller.set_mode(mode);
            }
        }
    };
    let on_symbol = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            if let Ok(symbol) = Symbol::new(event_target_value(&ev)) {
                controller.set_symbol(symbol);
            }
        }
    };
    let on_interval = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            if let Ok(interval) = TimeInterval::from_str(&event_target_value(&ev)) {
                controller.set_interval(interval);
            }
        }
    };
    let on_balance = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            if let Ok(value) = event_target_value(&ev).trim().parse::<f64>() {
                controller.set_initial_balance(value);
            }
        }
    };
    let on_risk = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            if let Ok(value) = event_target_value(&ev).trim().parse::<f64>() {
                controller.set_risk_pct(value);
            }
        }
    };
    let on_from = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            let to = state.with_untracked(|s| s.start_inputs.to_iso.clone());
            controller.set_training_window(event_target_value(&ev), to);
        }
    };
    let on_to = {
        let controller = controller.clone();
        move |ev: ev::Event| {
            let from = state.with_untracked(|s| s.start_inputs.from_iso.clone());
            controller.set_training_window(from, event_target_value(&ev));
        }
    };
    let command = move |command: Command| {
        let controller = controller.clone();
        move |_: ev::MouseEvent| controller.submit(command)
    };

    let symbol_options = config
        .symbols
        .iter()
        .map(|symbol| {
            let value = symbol.to_string();
            let current = value.clone();
            view! {
                <option value=value.clone() selected=move || state.with(|s| s.params.symbol.value() == current)>
                    {value}
                </option>
            }
        })
        .collect_view();
    let interval_options = config
        .intervals
        .iter()
        .map(|&interval| {
            view! {
                <option value=interval.as_query().to_string() selected=move || state.with(|s| s.params.interval == interval)>
                    {interval.to_string()}
                </option>
            }
        })
        .collect_view();
    let is_train = move || state.with(|s| s.params.mode == Mode::Train);

    view! {
        <div class="controls">
            <label>
                "Mode"
                <select on:change=on_mode>
                    <option value="TRAIN" selected=is_train>"TRAIN"</option>
                    <option value="LIVE" selected=move || !is_train()>"LIVE"</option>
                </select>
            </label>
            <label>"Symbol" <select on:change=on_symbol>{symbol_options}</select></label>
            <label>"Interval" <select on:change=on_interval>{interval_options}</select></label>
            <label>
                "Initial balance"
                <input
                    type="number"
                    step="100"
                    prop:value=move || state.with(|s| s.start_inputs.initial_balance.to_string())
                    on:change=on_balance
                />
            </label>
            <label>
                "Risk %"
                <input
                    type="number"
                    step="0.01"
                    prop:value=move || state.with(|s| s.start_inputs.risk_pct.to_string())
                    on:change=on_risk
                />
            </label>
            <Show when=is_train>
                <label>
                    "From (ISO)"
                    <input
                        type="text"
                        prop:value=move || state.with(|s| s.start_inputs.from_iso.clone())
                        on:change=on_from.clone()
                    />
                </label>
                <label>
                    "To (ISO)"
                    <input
                        type="text"
                        prop:value=move || state.with(|s| s.start_inputs.to_iso.clone())
                        on:change=on_to.clone()
                    />
                </label>
            </Show>
            <button on:click=command(Command::Start)>"▶️ Start"</button>
            <button on:click=command(Command::Pause)>"⏸️ Pause"</button>
            <button on:click=command(Command::Reset)>"🔄 Reset"</button>
        </div>
    }
}

#[component]
fn ErrorBanner() -> impl IntoView {
    let state = dashboard_state();
    let message = move || state.with(|s| s.error.clone());

    view! {
        <Show when=move || message().is_some()>
            <div class="error">{move || message().unwrap_or_default()}</div>
        </Show>
    }
}

#[component]
fn SummaryCard(derived: Memo<DashboardView>) -> impl IntoView {
    let summary = move || derived.with(|v| v.summary());

    view! {
        <section class="panel">
            <h2>"Portfolio summary"</h2>
            <Show
                when=move || summary().is_some()
                fallback=|| view! { <p class="empty">"No snapshots yet."</p> }
            >
                {move || summary().map(|figures| view! {
                    <div class="summary">
                        <div>
                            <div class="figure-value">{figures.total}</div>
                            <div class="figure-label">"Total"</div>
                        </div>
                        <div>
                            <div class="figure-value">{figures.cash}</div>
                            <div class="figure-label">"Cash"</div>
                        </div>
                        <div>
                            <div class="figure-value">{figures.position_value}</div>
                            <div class="figure-label">"Position value"</div>
                        </div>
                    </div>
                })}
            </Show>
        </section>
    }
}

#[component]
fn EquityChart(derived: Memo<DashboardView>) -> impl IntoView {
    let viewport = Viewport::default();
    let series = move |pick: fn(&EquityPoint) -> f64| {
        derived.with(|v| {
            v.equity_axis
                .map(|axis| polyline(&equity_points(&v.equity, &axis, &viewport, pick)))
                .unwrap_or_default()
        })
    };
    let bounds = move || derived.with(|v| v.equity_axis.map(|a| (a.max, a.min)));

    view! {
        <section class="panel">
            <h2>"Equity"</h2>
            <svg class="chart" viewBox=viewport.view_box() preserveAspectRatio="none">
                <polyline points=move || series(|p| p.total) fill="none" stroke="#f1c40f" stroke-width="2" />
                <polyline points=move || series(|p| p.cash) fill="none" stroke="#3498db" stroke-width="1" />
                <polyline points=move || series(|p| p.pos) fill="none" stroke="#9b59b6" stroke-width="1" />
                <text class="axis-label" x="4" y=viewport.margin>
                    {move || bounds().map(|(max, _)| format!("{max:.0}")).unwrap_or_default()}
                </text>
                <text class="axis-label" x="4" y=viewport.height - viewport.margin>
                    {move || bounds().map(|(_, min)| format!("{min:.0}")).unwrap_or_default()}
                </text>
            </svg>
        </section>
    }
}

#[component]
fn PriceChart(derived: Memo<DashboardView>) -> impl IntoView {
    let viewport = Viewport::default();
    let line = move || {
        derived.with(|v| {
            v.price_axis
                .map(|axis| polyline(&price_points(&v.prices, &axis, &viewport)))
                .unwrap_or_default()
        })
    };
    let dots = move || {
        derived.with(|v| {
            v.price_axis
                .map(|axis| marker_dots(&v.markers, &v.prices, &axis, &viewport))
                .unwrap_or_default()
        })
    };

    view! {
        <section class="panel">
            <h2>"Price"</h2>
            <svg class="chart" viewBox=viewport.view_box() preserveAspectRatio="none">
                <polyline points=line fill="none" stroke="#1abc9c" stroke-width="1.5" />
                {move || dots().into_iter().map(|dot| {
                    let color = dot.color();
                    view! {
                        <circle cx=dot.x cy=dot.y r="4" fill=color>
                            <title>{dot.title}</title>
                        </circle>
                    }
                }).collect_view()}
            </svg>
        </section>
    }
}

#[component]
fn TradeTable(derived: Memo<DashboardView>) -> impl IntoView {
    let rows = move || derived.with(|v| v.history.clone());

    view! {
        <section class="panel">
            <h2>"Trades"</h2>
            <Show
                when=move || derived.with(|v| !v.history.is_empty())
                fallback=|| view! { <p class="empty">"No trades yet."</p> }
            >
                <table>
                    <thead>
                        <tr>
                            <th>"Date"</th>
                            <th>"Side"</th>
                            <th>"Qty"</th>
                            <th>"Price"</th>
                            <th>"Fee"</th>
                            <th>"Realized PnL"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=rows
                            key=|row| row.key.clone()
                            children=|row| {
                                let side_class = format!("side-{}", row.side);
                                view! {
                                    <tr>
                                        <td>{row.date}</td>
                                        <td class=side_class>{row.side}</td>
                                        <td>{row.quantity}</td>
                                        <td>{row.price}</td>
                                        <td>{row.fee}</td>
                                        <td>{row.realized_pnl}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}
