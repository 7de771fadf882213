//! The fixed quotation layout: letterhead, title/date line, customer line,
//! item table and terms footer.

use serde::{Deserialize, Serialize};

use crate::format;
use crate::layout::{
    Align, Block, Cell, GridLines, Layout, PageSetup, Padding, Paragraph, Rgb, Row, RowRole,
    Rule, Table, TextRun, TextStyle, inch,
};
use crate::quotation::QuotationDocument;

pub const ITEM_HEADERS: [&str; 5] = ["sr no", "Description", "qty / sq.fee", "rate", "Amt"];
pub const TOTAL_LABEL: &str = "Total";

/// Business identity printed at the top of every quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Letterhead {
    pub monogram: String,
    pub monogram_color: Rgb,
    pub business_name: String,
    pub tagline: String,
    pub phones: Vec<String>,
    pub address: String,
    pub email: String,
    pub region: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            monogram: "SB".into(),
            monogram_color: Rgb::DARK_RED,
            business_name: "Shree Balaji Interiors".into(),
            tagline: "Modular Kitchen All Types of Wooden Furniture".into(),
            phones: vec!["9579455022".into(), "7588552035".into()],
            address: "Fadol Mala, Near Ambad Weight, Ambadgaon, Nashik-422010.".into(),
            email: "shreebalajiinteriors12@gmail.com".into(),
            region: "Maharashtra".into(),
        }
    }
}

/// Static terms printed under the item table.
///
/// The first line of each column is printed bold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Terms {
    pub payment: Vec<String>,
    pub materials: Vec<String>,
}

impl Default for Terms {
    fn default() -> Self {
        Self {
            payment: vec![
                "Payment Details: 60% Advanced".into(),
                "30% After delivery".into(),
                "10% After installation".into(),
            ],
            materials: vec![
                "Material Used".into(),
                "17 MM ISI Mark Calibrated Plywood".into(),
                "1.00 MM Laminate".into(),
            ],
        }
    }
}

/// Lays out quotation documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotationTemplate {
    pub letterhead: Letterhead,
    pub terms: Terms,
}

impl QuotationTemplate {
    pub fn new(letterhead: Letterhead, terms: Terms) -> Self {
        Self { letterhead, terms }
    }

    pub fn layout(&self, document: &QuotationDocument) -> Layout {
        let mut layout = Layout::new(
            format!("Quotation {}", document.customer_name()),
            PageSetup::a4(),
        );

        layout.push(Block::Table(self.letterhead_block()));
        layout.push(Block::Spacer(inch(0.1)));
        layout.push(Block::Rule(Rule {
            thickness: 3.0,
            color: Rgb::BLACK,
        }));
        layout.push(Block::Spacer(inch(0.1)));
        layout.push(Block::Table(title_block(document)));
        layout.push(Block::Spacer(inch(0.1)));
        layout.push(Block::Paragraph(
            Paragraph::text(
                format!("Name {}", document.customer_name()),
                TextStyle::bold(10.0),
            )
            .spaced(0.0, 12.0),
        ));
        layout.push(Block::Spacer(inch(0.1)));
        layout.push(Block::Table(item_table(document)));
        layout.push(Block::Spacer(inch(0.2)));
        layout.push(Block::Table(self.terms_block()));

        layout
    }

    fn letterhead_block(&self) -> Table {
        let head = &self.letterhead;
        let small = TextStyle::regular(8.0);
        let link = small.with_color(Rgb::BLUE);

        let mut contact = vec![TextRun::new("Mob.: ", small)];
        for (i, phone) in head.phones.iter().enumerate() {
            if i > 0 {
                contact.push(TextRun::new(", ", small));
            }
            contact.push(TextRun::new(phone.clone(), link));
        }

        let monogram = Paragraph::text(
            head.monogram.clone(),
            TextStyle::bold(24.0).with_color(head.monogram_color),
        );
        let name = Paragraph::text(head.business_name.clone(), TextStyle::bold(18.0))
            .aligned(Align::Center);

        Table::new(vec![inch(1.5), inch(4.5)])
            .with_padding(Padding::NONE)
            .with_rows(vec![
                Row::body(vec![Cell::new(monogram).spanning_rows(2), Cell::new(name)]),
                Row::body(vec![Cell::new(Paragraph::text(
                    head.tagline.clone(),
                    TextStyle::regular(10.0),
                ))]),
                Row::body(vec![
                    Cell::new(Paragraph::new(contact)),
                    Cell::new(Paragraph::text(head.address.clone(), small)),
                ]),
                Row::body(vec![
                    Cell::new(Paragraph::new(vec![
                        TextRun::new("Email: ", small),
                        TextRun::new(head.email.clone(), link),
                    ])),
                    Cell::new(Paragraph::text(format!("State : {}", head.region), small)),
                ]),
            ])
    }

    fn terms_block(&self) -> Table {
        let rows = self.terms.payment.len().max(self.terms.materials.len());
        let line = |lines: &[String], i: usize| {
            let style = if i == 0 {
                TextStyle::bold(9.0)
            } else {
                TextStyle::regular(9.0)
            };
            match lines.get(i) {
                Some(text) => Paragraph::text(text.clone(), style).spaced(0.0, 3.0),
                None => Paragraph::empty(),
            }
        };

        Table::new(vec![inch(3.0), inch(3.0)])
            .with_padding(Padding::symmetric(0.0, 6.0))
            .with_rows(
                (0..rows)
                    .map(|i| {
                        Row::body(vec![
                            Cell::new(line(&self.terms.payment, i)),
                            Cell::new(line(&self.terms.materials, i)),
                        ])
                    })
                    .collect(),
            )
    }
}

fn title_block(document: &QuotationDocument) -> Table {
    let style = TextStyle::bold(14.0);
    Table::new(vec![inch(3.0), inch(3.0)])
        .with_padding(Padding::symmetric(0.0, 6.0))
        .with_rows(vec![Row::body(vec![
            Cell::new(Paragraph::text("Quotation", style).spaced(0.0, 12.0)),
            Cell::new(
                Paragraph::text(
                    format!("Date: {}", format::document_date(document.issue_date())),
                    style,
                )
                .aligned(Align::Right)
                .spaced(0.0, 12.0),
            ),
        ])])
}

fn item_table(document: &QuotationDocument) -> Table {
    let header_style = TextStyle::bold(9.0);
    let cell_style = TextStyle::regular(9.0);
    let total_style = TextStyle::bold(10.0);

    let header = Row::new(
        RowRole::Header,
        ITEM_HEADERS
            .iter()
            .map(|label| {
                Cell::new(
                    Paragraph::text(*label, header_style)
                        .aligned(Align::Center)
                        .spaced(6.0, 6.0),
                )
            })
            .collect(),
    )
    .shaded(Rgb::LIGHT_GREY);

    let body = document.lines().iter().map(|line| {
        let cell = |text: String, align: Align| {
            Cell::new(
                Paragraph::text(text, cell_style)
                    .aligned(align)
                    .spaced(3.0, 3.0),
            )
        };
        Row::body(vec![
            cell(line.row_no.to_string(), Align::Left),
            cell(line.description.clone(), Align::Left),
            cell(format::operand(line.quantity), Align::Right),
            cell(format::operand(line.rate), Align::Right),
            cell(line.amount.format_grouped(), Align::Right),
        ])
    });

    let total_cell = |text: String| {
        Cell::new(
            Paragraph::text(text, total_style)
                .aligned(Align::Right)
                .spaced(6.0, 6.0),
        )
    };
    let total = Row::new(
        RowRole::Total,
        vec![
            Cell::empty().spanning_columns(3),
            total_cell(TOTAL_LABEL.to_string()),
            total_cell(document.total_amount().format_with_glyph()),
        ],
    )
    .shaded(Rgb::LIGHT_GREY);

    let mut rows = vec![header];
    rows.extend(body);
    rows.push(total);

    Table::new(vec![inch(0.5), inch(2.5), inch(1.0), inch(1.0), inch(1.0)])
        .with_grid(GridLines {
            width: 0.5,
            color: Rgb::BLACK,
        })
        .with_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core::str::FromStr;
    use quotegen_ledger::LineItem;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn document(name: &str, items: &[LineItem]) -> QuotationDocument {
        QuotationDocument::new(name, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(), items)
    }

    fn item_table_of(layout: &Layout) -> &Table {
        layout
            .tables()
            .find(|t| t.grid.is_some())
            .expect("item table")
    }

    fn cell_texts(row: &Row) -> Vec<String> {
        row.cells.iter().map(|c| c.content.plain_text()).collect()
    }

    #[test]
    fn regions_come_in_fixed_order() {
        let layout = QuotationTemplate::default().layout(&document("", &[]));
        let kinds: Vec<&str> = layout
            .blocks
            .iter()
            .filter(|b| !matches!(b, Block::Spacer(_)))
            .map(|b| match b {
                Block::Table(_) => "table",
                Block::Paragraph(_) => "paragraph",
                Block::Rule(_) => "rule",
                Block::Spacer(_) => unreachable!(),
            })
            .collect();
        assert_eq!(kinds, ["table", "rule", "table", "paragraph", "table", "table"]);
    }

    #[test]
    fn item_table_has_header_rows_and_total() {
        let items = [
            LineItem::new("Cabinet", dec("2"), dec("5000")),
            LineItem::blank(),
            LineItem::new("Handle", dec("10"), dec("50")),
        ];
        let layout = QuotationTemplate::default().layout(&document("Mr. Kasat", &items));
        let table = item_table_of(&layout);

        assert_eq!(table.rows.len(), 4);
        assert_eq!(cell_texts(&table.rows[0]), ITEM_HEADERS);
        assert_eq!(
            cell_texts(&table.rows[1]),
            ["1", "Cabinet", "2", "5000", "10,000.00"]
        );
        assert_eq!(cell_texts(&table.rows[2]), ["2", "Handle", "10", "50", "500.00"]);
        assert_eq!(cell_texts(&table.rows[3]), ["", "Total", "₹ 10,500.00"]);

        let total = &table.rows[3];
        assert_eq!(total.role, RowRole::Total);
        assert_eq!(total.cells[0].col_span, 3);
        assert_eq!(total.background, table.rows[0].background);
        assert!(table.placements().is_ok());
    }

    #[test]
    fn body_cells_align_text_left_and_numbers_right() {
        let items = [LineItem::new("Paint", dec("1"), dec("1200"))];
        let layout = QuotationTemplate::default().layout(&document("", &items));
        let aligns: Vec<Align> = item_table_of(&layout).rows[1]
            .cells
            .iter()
            .map(|c| c.content.align)
            .collect();
        assert_eq!(
            aligns,
            [Align::Left, Align::Left, Align::Right, Align::Right, Align::Right]
        );
    }

    #[test]
    fn empty_document_still_has_header_and_zero_total() {
        let layout = QuotationTemplate::default().layout(&document("", &[LineItem::blank()]));
        let table = item_table_of(&layout);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(cell_texts(&table.rows[1])[2], "₹ 0.00");
    }

    #[test]
    fn customer_line_keeps_label_when_name_is_empty() {
        let layout = QuotationTemplate::default().layout(&document("", &[]));
        let names: Vec<String> = layout.paragraphs().map(Paragraph::plain_text).collect();
        assert_eq!(names, ["Name "]);
    }

    #[test]
    fn title_line_prints_day_first_date() {
        let layout = QuotationTemplate::default().layout(&document("X", &[]));
        let title = layout.tables().nth(1).unwrap();
        assert_eq!(cell_texts(&title.rows[0]), ["Quotation", "Date: 31-01-2025"]);
    }

    #[test]
    fn letterhead_and_terms_use_static_defaults() {
        let layout = QuotationTemplate::default().layout(&document("X", &[]));
        let header = layout.tables().next().unwrap();
        assert_eq!(header.rows[0].cells[0].row_span, 2);
        assert_eq!(cell_texts(&header.rows[0])[1], "Shree Balaji Interiors");
        assert_eq!(
            cell_texts(&header.rows[2])[0],
            "Mob.: 9579455022, 7588552035"
        );
        assert_eq!(cell_texts(&header.rows[3])[1], "State : Maharashtra");

        let footer = layout.tables().last().unwrap();
        let rows: Vec<Vec<String>> = footer.rows.iter().map(cell_texts).collect();
        assert_eq!(
            rows,
            [
                ["Payment Details: 60% Advanced", "Material Used"],
                ["30% After delivery", "17 MM ISI Mark Calibrated Plywood"],
                ["10% After installation", "1.00 MM Laminate"],
            ]
        );
        assert_eq!(footer.rows[0].cells[0].content.runs[0].style.weight, crate::layout::Weight::Bold);
        assert_eq!(footer.rows[1].cells[1].content.runs[0].style.weight, crate::layout::Weight::Regular);
    }

    #[test]
    fn terms_can_be_overridden_from_json() {
        let template: QuotationTemplate = serde_json::from_str(
            r##"{"letterhead":{"monogram":"AB","monogram_color":"#003366"},
                "terms":{"materials":["Material Used","18 MM BWP Plywood"]}}"##,
        )
        .unwrap();
        assert_eq!(template.letterhead.monogram, "AB");
        assert_eq!(template.letterhead.business_name, "Shree Balaji Interiors");
        assert_eq!(template.terms.payment, Terms::default().payment);

        let layout = template.layout(&document("X", &[]));
        let footer = layout.tables().last().unwrap();
        assert_eq!(footer.rows.len(), 3);
        assert!(footer.rows[2].cells[1].content.is_blank());
    }

    #[test]
    fn same_input_gives_same_layout() {
        let items = [LineItem::new("Paint", dec("1"), dec("1200"))];
        let doc = document("", &items);
        let template = QuotationTemplate::default();
        assert_eq!(template.layout(&doc), template.layout(&doc));
    }
}
