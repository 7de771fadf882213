//! Item ledger: the editable working set of quotation rows.
//!
//! Pure in-memory state with derived totals. Nothing here knows about widgets
//! or documents.

pub mod item;
pub mod ledger;

pub use item::{ItemField, ItemUpdate, LineItem, compute_amount, parse_operand};
pub use ledger::{Ledger, LedgerEdit};
