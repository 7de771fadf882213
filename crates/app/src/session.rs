use chrono::NaiveDate;
use rust_decimal::Decimal;

use quotegen_core::{DomainError, DomainResult, Money};
use quotegen_document::{
    QuotationDocument, QuotationTemplate, RenderBackend, RenderedQuotation, render_quotation,
};
use quotegen_ledger::{ItemUpdate, Ledger, LedgerEdit, LineItem};

use crate::error::AppResult;

/// Shown when generation is attempted without a single eligible row.
pub const NO_VALID_ITEMS: &str =
    "Please add at least one valid item with a description, quantity, and rate.";

/// One person's quotation in progress: a customer name and the live ledger.
///
/// Numbers entering through the session are clamped to zero from below, so
/// the ledger never sees a negative operand from this surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotationSession {
    customer_name: String,
    ledger: Ledger,
}

impl QuotationSession {
    /// Empty name and a ledger with one blank row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session from previously entered rows. No rows gives the default ledger.
    pub fn with_items(
        customer_name: impl Into<String>,
        items: impl IntoIterator<Item = LineItem>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            ledger: Ledger::from_items(items.into_iter().map(clamp_item)),
        }
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn add_item(&mut self) {
        self.ledger.add_item();
    }

    /// Remove a row; removing the only row does nothing.
    pub fn remove_item(&mut self, index: usize) -> DomainResult<()> {
        self.ledger.apply(LedgerEdit::RemoveItem { index })
    }

    pub fn update_item(&mut self, index: usize, update: ItemUpdate) -> DomainResult<()> {
        self.apply(LedgerEdit::UpdateItem { index, update })
    }

    /// Apply a scripted edit, clamping any number it carries.
    pub fn apply(&mut self, edit: LedgerEdit) -> DomainResult<()> {
        let edit = match edit {
            LedgerEdit::UpdateItem { index, update } => LedgerEdit::UpdateItem {
                index,
                update: update.clamped(),
            },
            other => other,
        };
        self.ledger.apply(edit)
    }

    /// Per-row amounts in ledger order, as the form shows them.
    pub fn row_amounts(&self) -> Vec<Money> {
        self.ledger.items().iter().map(LineItem::amount).collect()
    }

    /// Live total over every row, eligible or not.
    pub fn grand_total(&self) -> Money {
        self.ledger.grand_total()
    }

    /// Snapshot the eligible rows for printing.
    ///
    /// Refuses with [`NO_VALID_ITEMS`] when no row is eligible.
    pub fn document(&self, issue_date: NaiveDate) -> DomainResult<QuotationDocument> {
        if self.ledger.eligible_items().next().is_none() {
            tracing::warn!(
                rows = self.ledger.len(),
                "quotation refused: no eligible items"
            );
            return Err(DomainError::validation(NO_VALID_ITEMS));
        }
        Ok(QuotationDocument::new(
            self.customer_name.clone(),
            issue_date,
            self.ledger.eligible_items(),
        ))
    }

    /// Build the document for `issue_date` and render it with `backend`.
    pub fn generate(
        &self,
        issue_date: NaiveDate,
        template: &QuotationTemplate,
        backend: &dyn RenderBackend,
    ) -> AppResult<RenderedQuotation> {
        let document = self.document(issue_date)?;
        let rendered = render_quotation(&document, template, backend)?;
        tracing::info!(
            quotation_id = %rendered.id,
            file_name = %rendered.file_name,
            "quotation generated"
        );
        Ok(rendered)
    }
}

fn clamp_item(item: LineItem) -> LineItem {
    let clamp = |v: Option<Decimal>| v.map(|v| v.max(Decimal::ZERO));
    LineItem {
        quantity: clamp(item.quantity),
        rate: clamp(item.rate),
        ..item
    }
}
