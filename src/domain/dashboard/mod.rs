//! Dashboard aggregate: canonical rows, their normalization from raw service
//! payloads, derived views, and the service seam.

pub mod entities;
pub mod normalizer;
pub mod repositories;
pub mod value_objects;
pub mod views;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
pub use views::*;
