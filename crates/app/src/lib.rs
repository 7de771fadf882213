//! Input surface for quotations: sessions, request files, configuration, CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod request;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use request::QuotationRequest;
pub use session::{NO_VALID_ITEMS, QuotationSession};
