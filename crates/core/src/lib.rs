//! `quotegen-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no rendering).

pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{Entity, QuotationId};
pub use money::{CURRENCY_GLYPH, Money};
pub use value_object::ValueObject;
