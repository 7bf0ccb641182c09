pub mod commands;
pub mod controller;
pub mod runtime;
pub mod state;

pub use commands::*;
pub use controller::*;
pub use runtime::*;
pub use state::*;
