//! Quotation documents: from eligible ledger rows to printable bytes.
//!
//! The pipeline has three explicit steps:
//!
//! 1. [`QuotationDocument::new`] keeps the eligible rows, renumbers them and
//!    computes the printed total.
//! 2. [`QuotationTemplate::layout`] turns the document into a [`Layout`] tree
//!    (header, title/date line, customer line, item table, footer).
//! 3. A [`RenderBackend`] turns the layout into bytes: [`PdfBackend`] for the
//!    downloadable file, [`TextBackend`] for previews.
//!
//! No step performs IO.

pub mod backend;
pub mod error;
pub mod format;
pub mod layout;
pub mod quotation;
pub mod template;

pub use backend::{PdfBackend, RenderBackend, TextBackend};
pub use error::RenderError;
pub use layout::Layout;
pub use quotation::{QuotationDocument, QuotationLine, RenderedQuotation, render_quotation};
pub use template::{Letterhead, QuotationTemplate, Terms};
