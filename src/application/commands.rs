use super::controller::{CycleOutcome, DashboardController};
use super::runtime::Runtime;
use crate::domain::dashboard::BotApi;
use crate::domain::errors::ApiResult;
use crate::domain::logging::{LogComponent, get_logger};
use strum::{AsRefStr, Display};

/// User actions forwarded to the bot service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Start,
    Pause,
    Reset,
}

/// What a dispatched command did
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub command: ApiResult<()>,
    pub refresh: CycleOutcome,
}

impl<A: BotApi + 'static, R: Runtime> DashboardController<A, R> {
    /// Send `command`, then refresh once whatever the command's outcome.
    ///
    /// A failed command keeps its message in the error slot unless the
    /// follow-up refresh fails too, in which case the refresh error replaces
    /// it.
    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        self.clear_error();
        let state = self.state();
        get_logger().info(
            LogComponent::Application("Commands"),
            &format!("➡️ {} for {} {}", command, state.params.mode, state.params.symbol),
        );

        let api = &self.inner.api;
        let result = match command {
            Command::Start => api.start(&state.start_request()).await,
            Command::Pause => api.pause().await,
            Command::Reset => api.reset(state.params.mode, &state.params.symbol).await,
        };

        if let Err(err) = &result {
            get_logger().error(
                LogComponent::Application("Commands"),
                &format!("❌ {command} failed: {err}"),
            );
            self.set_error(err);
        }

        let refresh = self.run_cycle(result.is_ok()).await;
        CommandOutcome { command: result, refresh }
    }

    /// Fire-and-forget variant for UI event handlers
    pub fn submit(&self, command: Command) {
        let this = self.clone();
        self.spawn_task(Box::pin(async move {
            this.dispatch(command).await;
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn commands_display_in_lowercase() {
        assert_eq!(Command::Start.to_string(), "start");
        assert_eq!(Command::Reset.as_ref(), "reset");
    }
}
