pub mod dashboard;
pub mod errors;
pub mod logging;
