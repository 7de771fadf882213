//! Output backends. Each turns the same [`Layout`] into a different byte format.

mod metrics;
pub mod pdf;
pub mod text;

pub use pdf::PdfBackend;
pub use text::TextBackend;

use crate::error::RenderError;
use crate::layout::Layout;

pub trait RenderBackend {
    /// Produce the complete output in memory.
    fn render(&self, layout: &Layout) -> Result<Vec<u8>, RenderError>;

    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;
}
