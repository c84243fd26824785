pub mod config;
pub mod error;
pub mod types;

pub use config::ServiceConfig;
pub use error::{ServiceError, error_code};
pub use types::{ListParams, ListResult, new_id, now_rfc3339};
