//! Plain-text rendition of a layout, for terminals and previews.

use super::RenderBackend;
use super::metrics::{char_width, wrap_runs};
use crate::error::RenderError;
use crate::layout::{Align, Block, Layout, Paragraph, Table};

/// Renders layouts as UTF-8 text.
///
/// Tables with grid lines are boxed with `+`, `-` and `|`; tables without grid
/// lines are set in plain columns. Cell text is never wrapped.
#[derive(Debug, Clone, Copy)]
pub struct TextBackend {
    /// Width used for paragraphs and rules, in characters.
    pub width: usize,
}

impl Default for TextBackend {
    fn default() -> Self {
        Self { width: 80 }
    }
}

impl RenderBackend for TextBackend {
    fn render(&self, layout: &Layout) -> Result<Vec<u8>, RenderError> {
        let mut out: Vec<String> = Vec::new();
        for block in &layout.blocks {
            match block {
                Block::Table(table) => out.extend(self.table(table)?),
                Block::Paragraph(paragraph) => out.extend(self.paragraph(paragraph)),
                Block::Rule(_) => out.push("=".repeat(self.width)),
                Block::Spacer(_) => {
                    if out.last().is_some_and(|line| !line.is_empty()) {
                        out.push(String::new());
                    }
                }
            }
        }

        let mut text = out.join("\n");
        text.push('\n');
        Ok(text.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    let gap = width.saturating_sub(len);
    match align {
        Align::Left => format!("{text}{}", " ".repeat(gap)),
        Align::Right => format!("{}{text}", " ".repeat(gap)),
        Align::Center => {
            let before = gap / 2;
            format!("{}{text}{}", " ".repeat(before), " ".repeat(gap - before))
        }
    }
}

impl TextBackend {
    fn paragraph(&self, paragraph: &Paragraph) -> Vec<String> {
        let lines = wrap_runs(&paragraph.runs, self.width as f32, &char_width);
        if lines.is_empty() {
            // Keep label-only lines such as "Name " visible.
            return vec![paragraph.plain_text().trim_end().to_string()];
        }
        lines
            .iter()
            .map(|line| {
                let text: String = line.iter().map(|run| run.text.as_str()).collect();
                pad(&text, self.width, paragraph.align).trim_end().to_string()
            })
            .collect()
    }

    fn table(&self, table: &Table) -> Result<Vec<String>, RenderError> {
        let placements = table.placements()?;
        let columns = table.column_widths.len();
        let boxed = table.grid.is_some();
        let separator = if boxed { 3 } else { 2 };

        let mut widths = vec![0usize; columns];
        for placed in placements.iter().filter(|p| p.cell.col_span <= 1) {
            let len = placed.cell.content.plain_text().chars().count();
            widths[placed.column] = widths[placed.column].max(len);
        }
        for placed in placements.iter().filter(|p| p.cell.col_span > 1) {
            let len = placed.cell.content.plain_text().chars().count();
            let end = (placed.column + placed.cell.col_span).min(columns);
            let available: usize =
                widths[placed.column..end].iter().sum::<usize>() + separator * (end - placed.column - 1);
            if len > available {
                widths[end - 1] += len - available;
            }
        }

        let border = {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&"-".repeat(width + 2));
                line.push('+');
            }
            line
        };

        let mut lines = Vec::new();
        if boxed {
            lines.push(border.clone());
        }
        for r in 0..table.rows.len() {
            let mut line = String::from(if boxed { "|" } else { "" });
            let mut column = 0;
            while column < columns {
                let placed = placements.iter().find(|p| p.row == r && p.column == column);
                let span = placed.map_or(1, |p| p.cell.col_span.max(1)).min(columns - column);
                let width = widths[column..column + span].iter().sum::<usize>() + separator * (span - 1);
                let cell = match placed {
                    Some(p) => pad(&p.cell.content.plain_text(), width, p.cell.content.align),
                    None => " ".repeat(width),
                };
                if boxed {
                    line.push(' ');
                    line.push_str(&cell);
                    line.push_str(" |");
                } else {
                    if column > 0 {
                        line.push_str("  ");
                    }
                    line.push_str(&cell);
                }
                column += span;
            }
            lines.push(line.trim_end().to_string());
            if boxed {
                lines.push(border.clone());
            }
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core::str::FromStr;
    use quotegen_ledger::LineItem;
    use rust_decimal::Decimal;

    use crate::quotation::QuotationDocument;
    use crate::template::QuotationTemplate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn render(name: &str, items: &[LineItem]) -> String {
        let doc = QuotationDocument::new(name, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), items);
        let layout = QuotationTemplate::default().layout(&doc);
        String::from_utf8(TextBackend::default().render(&layout).unwrap()).unwrap()
    }

    fn boxed_cells(line: &str) -> Vec<String> {
        line.trim_matches('|')
            .split('|')
            .map(|cell| cell.trim().to_string())
            .collect()
    }

    fn table_rows(text: &str) -> Vec<Vec<String>> {
        text.lines()
            .filter(|line| line.starts_with('|'))
            .map(boxed_cells)
            .collect()
    }

    #[test]
    fn renders_rows_and_total_in_a_box() {
        let text = render(
            "Mr. Kasat",
            &[
                LineItem::new("Cabinet", dec("2"), dec("5000")),
                LineItem::blank(),
                LineItem::new("Handle", dec("10"), dec("50")),
            ],
        );
        let rows = table_rows(&text);
        assert_eq!(
            rows,
            [
                vec!["sr no", "Description", "qty / sq.fee", "rate", "Amt"],
                vec!["1", "Cabinet", "2", "5000", "10,000.00"],
                vec!["2", "Handle", "10", "50", "500.00"],
                vec!["", "Total", "₹ 10,500.00"],
            ]
        );
        assert!(text.contains("Name Mr. Kasat"));
        assert!(text.contains("Date: 01-06-2024"));
    }

    #[test]
    fn empty_name_keeps_label() {
        let text = render("", &[LineItem::new("Paint", dec("1"), dec("1200"))]);
        assert!(text.lines().any(|line| line == "Name"));
        assert!(text.contains("₹ 1,200.00"));
    }

    #[test]
    fn numbers_are_right_aligned() {
        let text = render("", &[LineItem::new("Paint", dec("1"), dec("1200"))]);
        let header = text.lines().find(|l| l.contains("Amt")).unwrap();
        let row = text.lines().find(|l| l.contains("Paint")).unwrap();
        let end_of_amount = row.find("1,200.00").unwrap() + "1,200.00".len();
        let end_of_header = header.find("Amt").unwrap() + "Amt".len();
        assert!(end_of_amount >= end_of_header);
    }

    #[test]
    fn header_and_footer_are_unboxed_columns() {
        let text = render("X", &[]);
        assert!(text.contains("Shree Balaji Interiors"));
        assert!(text.lines().any(|l| l.starts_with("Payment Details: 60% Advanced") && l.contains("Material Used")));
        assert!(text.lines().any(|l| l.starts_with("=")));
    }

    #[test]
    fn output_is_deterministic() {
        let items = [LineItem::new("Paint", dec("1"), dec("1200"))];
        assert_eq!(render("A", &items), render("A", &items));
    }
}
