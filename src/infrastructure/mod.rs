pub mod browser_runtime;
pub mod http;
pub mod services;

pub use browser_runtime::*;
pub use http::*;
pub use services::*;
