//! PDF rendition through `printpdf`, using the built-in Helvetica fonts.

use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon,
};

use quotegen_core::CURRENCY_GLYPH;

use super::RenderBackend;
use super::metrics::{helvetica_width, line_width, winansi_code, wrap_runs};
use crate::error::RenderError;
use crate::layout::{
    Align, Block, GridLines, Layout, PageSetup, Paragraph, Rgb, Rule, Table, TextRun, Weight,
};

const LAYER_NAME: &str = "Layer 1";

/// Renders layouts as A4 PDF documents.
///
/// Text is limited to what the standard fonts can encode; see [`pdf_text`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBackend;

impl RenderBackend for PdfBackend {
    fn render(&self, layout: &Layout) -> Result<Vec<u8>, RenderError> {
        let mut canvas = Canvas::new(layout)?;
        for block in &layout.blocks {
            match block {
                Block::Table(table) => canvas.table(table)?,
                Block::Paragraph(paragraph) => canvas.paragraph(paragraph),
                Block::Rule(rule) => canvas.rule(rule),
                Block::Spacer(height) => canvas.spacer(*height),
            }
        }
        tracing::debug!(pages = canvas.pages, "pdf laid out");
        canvas.finish()
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Text as the built-in fonts can show it: every character WinAnsi can encode
/// is kept, the currency glyph becomes `Rs.`, anything else becomes `?`.
pub fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            CURRENCY_GLYPH => out.push_str("Rs."),
            c if winansi_code(c).is_some() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn pdf_runs(runs: &[TextRun]) -> Vec<TextRun> {
    runs.iter()
        .map(|run| TextRun::new(pdf_text(&run.text), run.style))
        .collect()
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(color.r, color.g, color.b, None))
}

/// A cell with its text already broken into lines.
struct PreparedCell {
    row: usize,
    column: usize,
    row_span: usize,
    width: f32,
    height: f32,
    paragraph: Paragraph,
    lines: Vec<Vec<TextRun>>,
}

/// Drawing state: the current page layer and a cursor measured from the top
/// edge of the page, in points.
struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page: PageSetup,
    cursor: f32,
    pages: usize,
}

impl Canvas {
    fn new(layout: &Layout) -> Result<Self, RenderError> {
        let page = layout.page;
        let (doc, page_index, layer_index) = PdfDocument::new(
            layout.title.clone(),
            mm(page.width),
            mm(page.height),
            LAYER_NAME,
        );
        let layer = doc.get_page(page_index).get_layer(layer_index);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(RenderError::backend)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(RenderError::backend)?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            page,
            cursor: page.margin,
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut writer = BufWriter::new(Vec::<u8>::new());
        self.doc.save(&mut writer).map_err(RenderError::backend)?;
        writer.into_inner().map_err(RenderError::backend)
    }

    fn bottom(&self) -> f32 {
        self.page.height - self.page.margin
    }

    fn new_page(&mut self) {
        let (page_index, layer_index) =
            self.doc
                .add_page(mm(self.page.width), mm(self.page.height), LAYER_NAME);
        self.layer = self.doc.get_page(page_index).get_layer(layer_index);
        self.cursor = self.page.margin;
        self.pages += 1;
    }

    /// Start a new page unless `height` still fits. Content taller than a whole
    /// page is drawn anyway and overflows.
    fn ensure_space(&mut self, height: f32) {
        if self.cursor + height > self.bottom() && self.cursor > self.page.margin {
            self.new_page();
        }
    }

    fn point(&self, x: f32, top: f32) -> Point {
        Point::new(mm(x), mm(self.page.height - top))
    }

    fn font(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    fn spacer(&mut self, height: f32) {
        self.cursor = (self.cursor + height).min(self.bottom());
    }

    fn rule(&mut self, rule: &Rule) {
        self.ensure_space(rule.thickness);
        let y = self.cursor + rule.thickness / 2.0;
        self.layer.set_outline_color(pdf_color(rule.color));
        self.layer.set_outline_thickness(rule.thickness);
        self.layer.add_line(Line {
            points: vec![
                (self.point(self.page.margin, y), false),
                (self.point(self.page.width - self.page.margin, y), false),
            ],
            is_closed: false,
        });
        self.cursor += rule.thickness;
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let width = self.page.frame_width();
        let lines = wrap_runs(&pdf_runs(&paragraph.runs), width, &helvetica_width);
        let leading = paragraph.leading();

        self.cursor += paragraph.space_before;
        for line in &lines {
            self.ensure_space(leading);
            self.text_line(line, self.page.margin, width, paragraph.align, self.cursor);
            self.cursor += leading;
        }
        self.cursor += paragraph.space_after;
    }

    /// Draw one wrapped line whose box starts `line_top` points below the page top.
    fn text_line(&self, line: &[TextRun], left: f32, width: f32, align: Align, line_top: f32) {
        let used = line_width(line, &helvetica_width);
        let mut x = match align {
            Align::Left => left,
            Align::Center => left + (width - used).max(0.0) / 2.0,
            Align::Right => left + (width - used).max(0.0),
        };
        let size = line.iter().map(|run| run.style.size).fold(0.0, f32::max);
        let baseline = self.page.height - (line_top + size);

        for run in line {
            self.layer.set_fill_color(pdf_color(run.style.color));
            self.layer.use_text(
                run.text.clone(),
                run.style.size,
                mm(x),
                mm(baseline),
                self.font(run.style.weight),
            );
            x += helvetica_width(&run.text, &run.style);
        }
        self.layer.set_fill_color(pdf_color(Rgb::BLACK));
    }

    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_polygon(Polygon {
            rings: vec![vec![
                (self.point(x, top), false),
                (self.point(x + width, top), false),
                (self.point(x + width, top + height), false),
                (self.point(x, top + height), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        self.layer.set_fill_color(pdf_color(Rgb::BLACK));
    }

    fn stroke_rect(&self, x: f32, top: f32, width: f32, height: f32, grid: GridLines) {
        self.layer.set_outline_color(pdf_color(grid.color));
        self.layer.set_outline_thickness(grid.width);
        self.layer.add_line(Line {
            points: vec![
                (self.point(x, top), false),
                (self.point(x + width, top), false),
                (self.point(x + width, top + height), false),
                (self.point(x, top + height), false),
            ],
            is_closed: true,
        });
    }

    fn table(&mut self, table: &Table) -> Result<(), RenderError> {
        let padding = table.padding;
        let frame = self.page.frame_width();
        let left = self.page.margin
            + match table.align {
                Align::Left => 0.0,
                Align::Center => (frame - table.width()).max(0.0) / 2.0,
                Align::Right => (frame - table.width()).max(0.0),
            };
        let column_x: Vec<f32> = table
            .column_widths
            .iter()
            .scan(left, |x, width| {
                let start = *x;
                *x += width;
                Some(start)
            })
            .collect();

        let cells: Vec<PreparedCell> = table
            .placements()?
            .into_iter()
            .map(|placed| {
                let width = table.span_width(placed.column, placed.cell.col_span);
                let inner = (width - padding.left - padding.right).max(1.0);
                let content = &placed.cell.content;
                let lines = wrap_runs(&pdf_runs(&content.runs), inner, &helvetica_width);
                let height = lines.len() as f32 * content.leading()
                    + content.space_before
                    + content.space_after
                    + padding.top
                    + padding.bottom;
                PreparedCell {
                    row: placed.row,
                    column: placed.column,
                    row_span: placed.cell.row_span.max(1).min(table.rows.len() - placed.row),
                    width,
                    height,
                    paragraph: content.clone(),
                    lines,
                }
            })
            .collect();

        let mut heights = vec![padding.top + padding.bottom; table.rows.len()];
        for cell in cells.iter().filter(|c| c.row_span == 1) {
            heights[cell.row] = heights[cell.row].max(cell.height);
        }
        for cell in cells.iter().filter(|c| c.row_span > 1) {
            let last = cell.row + cell.row_span - 1;
            let spanned: f32 = heights[cell.row..=last].iter().sum();
            if cell.height > spanned {
                heights[last] += cell.height - spanned;
            }
        }

        for (r, row) in table.rows.iter().enumerate() {
            self.ensure_space(heights[r]);
            let top = self.cursor;
            if let Some(background) = row.background {
                self.fill_rect(left, top, table.width(), heights[r], background);
            }

            for cell in cells.iter().filter(|c| c.row == r) {
                let x = column_x[cell.column];
                let inner = cell.width - padding.left - padding.right;
                let leading = cell.paragraph.leading();
                let mut line_top = top + padding.top + cell.paragraph.space_before;
                for line in &cell.lines {
                    self.text_line(line, x + padding.left, inner, cell.paragraph.align, line_top);
                    line_top += leading;
                }
                if let Some(grid) = table.grid {
                    let height: f32 = heights[r..r + cell.row_span].iter().sum();
                    self.stroke_rect(x, top, cell.width, height, grid);
                }
            }

            self.cursor += heights[r];
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core::str::FromStr;
    use flate2::read::ZlibDecoder;
    use quotegen_ledger::LineItem;
    use rust_decimal::Decimal;
    use std::io::Read;

    use crate::quotation::QuotationDocument;
    use crate::template::QuotationTemplate;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Page content streams of a PDF, inflated when they are compressed.
    fn content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
        let mut streams = Vec::new();
        let mut rest = pdf;
        while let Some(start) = find(rest, b"stream") {
            let mut body = &rest[start + b"stream".len()..];
            body = body.strip_prefix(b"\r\n").or_else(|| body.strip_prefix(b"\n")).unwrap_or(body);
            let Some(end) = find(body, b"endstream") else { break };
            let raw = &body[..end];
            let mut inflated = Vec::new();
            match ZlibDecoder::new(raw).read_to_end(&mut inflated) {
                Ok(_) => streams.push(inflated),
                Err(_) => streams.push(raw.to_vec()),
            }
            rest = &body[end + b"endstream".len()..];
        }
        streams
    }

    /// Whether some text-showing operator draws exactly `text`, as a hex or
    /// literal string in WinAnsi.
    fn draws(pdf: &[u8], text: &str) -> bool {
        let bytes: Vec<u8> = text.chars().map(|c| winansi_code(c).unwrap()).collect();
        let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
        let hex = format!("<{hex}>").into_bytes();
        let mut literal = b"(".to_vec();
        literal.extend_from_slice(&bytes);
        literal.push(b')');

        content_streams(pdf).iter().any(|stream| {
            let upper = stream.to_ascii_uppercase();
            find(&upper, &hex).is_some() || find(stream, &literal).is_some()
        })
    }

    fn layout_for(customer: &str, items: &[LineItem]) -> Layout {
        let doc = QuotationDocument::new(
            customer,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            items,
        );
        QuotationTemplate::default().layout(&doc)
    }

    fn layout_with(rows: usize) -> Layout {
        let items: Vec<LineItem> = (0..rows)
            .map(|i| {
                LineItem::new(
                    format!("Wardrobe shutter {i}"),
                    Decimal::from_str("2.5").unwrap(),
                    Decimal::from_str("1450").unwrap(),
                )
            })
            .collect();
        let doc = QuotationDocument::new(
            "Mr. Pavan kasat",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            &items,
        );
        QuotationTemplate::default().layout(&doc)
    }

    #[test]
    fn currency_glyph_is_spelled_out() {
        assert_eq!(pdf_text("₹ 10,500.00"), "Rs. 10,500.00");
        assert_eq!(pdf_text("Name "), "Name ");
    }

    #[test]
    fn winansi_letters_are_kept() {
        assert_eq!(pdf_text("Café"), "Café");
        assert_eq!(pdf_text("José Müller – 5½"), "José Müller – 5½");
        assert_eq!(pdf_text("नमस्ते 日本"), "?????? ??");
    }

    #[test]
    fn accented_customer_text_is_drawn_as_entered() {
        let items = [LineItem::new("Tür", Decimal::ONE, Decimal::from(100))];
        let bytes = PdfBackend.render(&layout_for("José", &items)).unwrap();

        assert!(draws(&bytes, "Name José"));
        assert!(draws(&bytes, "Tür"));
        assert!(draws(&bytes, "Rs. 100.00"));
        assert!(!draws(&bytes, "Name Jos?"));
    }

    #[test]
    fn letterhead_email_keeps_its_domain_together() {
        let items = [LineItem::new("Paint", Decimal::ONE, Decimal::from(1200))];
        let bytes = PdfBackend.render(&layout_for("", &items)).unwrap();

        assert!(draws(&bytes, "shreebalajiinteriors12@"));
        assert!(draws(&bytes, "gmail.com"));
    }

    #[test]
    fn renders_a_pdf_file() {
        let bytes = PdfBackend.render(&layout_with(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn long_tables_continue_on_new_pages() {
        let layout = layout_with(120);
        let mut canvas = Canvas::new(&layout).unwrap();
        for block in &layout.blocks {
            match block {
                Block::Table(table) => canvas.table(table).unwrap(),
                Block::Paragraph(p) => canvas.paragraph(p),
                Block::Rule(rule) => canvas.rule(rule),
                Block::Spacer(h) => canvas.spacer(*h),
            }
            assert!(canvas.cursor <= canvas.bottom() + 1.0);
        }
        assert!(canvas.pages >= 3);
        assert!(canvas.finish().unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn short_quotation_fits_one_page() {
        let layout = layout_with(2);
        let mut canvas = Canvas::new(&layout).unwrap();
        for block in &layout.blocks {
            if let Block::Table(table) = block {
                canvas.table(table).unwrap();
            }
        }
        assert_eq!(canvas.pages, 1);
    }
}
