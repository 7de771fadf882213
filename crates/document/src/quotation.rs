use chrono::NaiveDate;
use rust_decimal::Decimal;

use quotegen_core::{Entity, Money, QuotationId, ValueObject};
use quotegen_ledger::{LineItem, compute_amount};

use crate::backend::RenderBackend;
use crate::error::RenderError;
use crate::format;
use crate::template::QuotationTemplate;

/// One printed row: an eligible ledger item with its document row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationLine {
    /// 1-based, counting eligible rows only.
    pub row_no: usize,
    pub description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Money,
}

impl ValueObject for QuotationLine {}

/// A quotation as it will be printed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationDocument {
    id: QuotationId,
    customer_name: String,
    issue_date: NaiveDate,
    lines: Vec<QuotationLine>,
    total_amount: Money,
}

impl QuotationDocument {
    /// Snapshot the eligible subset of `items`, numbered 1..N in input order.
    ///
    /// Ineligible items are skipped, so passing an already filtered list is
    /// harmless. An empty result is allowed and prints a zero total; refusing
    /// to generate is the caller's decision.
    pub fn new<'a>(
        customer_name: impl Into<String>,
        issue_date: NaiveDate,
        items: impl IntoIterator<Item = &'a LineItem>,
    ) -> Self {
        let lines: Vec<QuotationLine> = items
            .into_iter()
            .filter(|item| item.is_eligible())
            .filter_map(|item| Some((item, item.quantity?, item.rate?)))
            .enumerate()
            .map(|(i, (item, quantity, rate))| QuotationLine {
                row_no: i + 1,
                description: item.description.clone(),
                quantity,
                rate,
                amount: compute_amount(item),
            })
            .collect();
        let total_amount = lines.iter().map(|line| line.amount).sum();

        Self {
            id: QuotationId::new(),
            customer_name: customer_name.into(),
            issue_date,
            lines,
            total_amount,
        }
    }

    /// Replace the generated identifier (tests, replays).
    pub fn with_id(self, id: QuotationId) -> Self {
        Self { id, ..self }
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn lines(&self) -> &[QuotationLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `Quotation_<name with underscores>_<YYYYMMDD>` without extension.
    ///
    /// Path separators in the name are replaced too, so the stem is always a
    /// single file name.
    pub fn file_stem(&self) -> String {
        let name: String = self
            .customer_name
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '_',
                other => other,
            })
            .collect();
        format!("Quotation_{name}_{}", format::file_date(self.issue_date))
    }

    /// Suggested download name for the PDF rendition.
    pub fn suggested_file_name(&self) -> String {
        format!("{}.pdf", self.file_stem())
    }
}

impl Entity for QuotationDocument {
    type Id = QuotationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Bytes of a rendered quotation plus what a consumer needs to deliver them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuotation {
    pub id: QuotationId,
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

/// Lay out `document` with `template` and render it with `backend`.
pub fn render_quotation(
    document: &QuotationDocument,
    template: &QuotationTemplate,
    backend: &dyn RenderBackend,
) -> Result<RenderedQuotation, RenderError> {
    let span = tracing::info_span!("render_quotation", quotation_id = %document.id());
    let _guard = span.enter();

    let layout = template.layout(document);
    let bytes = backend.render(&layout)?;

    tracing::info!(
        rows = document.lines().len(),
        total = %document.total_amount(),
        bytes = bytes.len(),
        content_type = backend.content_type(),
        "quotation rendered"
    );

    Ok(RenderedQuotation {
        id: *document.id(),
        bytes,
        file_name: format!("{}.{}", document.file_stem(), backend.extension()),
        content_type: backend.content_type(),
    })
}
