//! Request files: a customer name, seed rows and edits to replay.

use std::path::Path;

use serde::{Deserialize, Serialize};

use quotegen_ledger::{LedgerEdit, LineItem};

use crate::error::{AppError, AppResult};
use crate::session::QuotationSession;

/// What a scripted caller submits instead of filling in the form.
///
/// ```json
/// { "customer_name": "Mr. Kasat",
///   "items": [{ "description": "Cabinet", "quantity": 2, "rate": "5000" }],
///   "edits": [{ "op": "add_item" }] }
/// ```
///
/// Operands may be numbers or numeric strings; anything else is kept as an
/// absent operand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotationRequest {
    pub customer_name: String,
    pub items: Vec<LineItem>,
    pub edits: Vec<LedgerEdit>,
}

impl QuotationRequest {
    pub fn from_json(text: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| AppError::io_at("reading", path, e))?;
        Self::from_json(&text)
    }

    /// Seed a session with `items`, then replay `edits` in order.
    pub fn into_session(self) -> AppResult<QuotationSession> {
        let mut session = QuotationSession::with_items(self.customer_name, self.items);
        for edit in self.edits {
            session.apply(edit)?;
        }
        tracing::debug!(rows = session.ledger().len(), "request loaded");
        Ok(session)
    }
}
