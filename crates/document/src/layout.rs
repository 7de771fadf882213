//! Backend-neutral description of a printed page flow.
//!
//! All lengths are PDF points (1/72 inch). A [`Layout`] is a flat list of
//! blocks stacked top to bottom inside the page margins; backends decide where
//! pages break.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub const POINTS_PER_INCH: f32 = 72.0;

/// `n` inches in points.
pub fn inch(n: f32) -> f32 {
    n * POINTS_PER_INCH
}

/// An sRGB color with components in `0.0..=1.0`.
///
/// Serialized as `#RRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const DARK_RED: Rgb = Rgb::new(0.54, 0.0, 0.0);
    pub const LIGHT_GREY: Rgb = Rgb::new(0.827, 0.827, 0.827);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("expected a #RRGGBB color, got {hex:?}"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|_| format!("expected a #RRGGBB color, got {hex:?}"))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub weight: Weight,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub fn regular(size: f32) -> Self {
        Self {
            weight: Weight::Regular,
            size,
            color: Rgb::BLACK,
        }
    }

    pub fn bold(size: f32) -> Self {
        Self {
            weight: Weight::Bold,
            ..Self::regular(size)
        }
    }

    pub fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }

    /// Line height used when this style sets the line.
    pub fn leading(&self) -> f32 {
        self.size * 1.2
    }
}

/// A piece of text in one style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Styled runs that wrap as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub align: Align,
    pub space_before: f32,
    pub space_after: f32,
}

impl Paragraph {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            align: Align::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Self::new(vec![TextRun::new(text, style)])
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn aligned(self, align: Align) -> Self {
        Self { align, ..self }
    }

    pub fn spaced(self, before: f32, after: f32) -> Self {
        Self {
            space_before: before,
            space_after: after,
            ..self
        }
    }

    /// The paragraph's text with styling dropped.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    /// Tallest line height among the runs; 0 for a blank paragraph.
    pub fn leading(&self) -> f32 {
        self.runs
            .iter()
            .map(|run| run.style.leading())
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: Paragraph,
    pub col_span: usize,
    pub row_span: usize,
}

impl Cell {
    pub fn new(content: Paragraph) -> Self {
        Self {
            content,
            col_span: 1,
            row_span: 1,
        }
    }

    pub fn empty() -> Self {
        Self::new(Paragraph::empty())
    }

    pub fn spanning_columns(self, col_span: usize) -> Self {
        Self {
            col_span: col_span.max(1),
            ..self
        }
    }

    pub fn spanning_rows(self, row_span: usize) -> Self {
        Self {
            row_span: row_span.max(1),
            ..self
        }
    }
}

/// What a row means inside its table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RowRole {
    Header,
    Body,
    Total,
}

/// One table row.
///
/// Cells fill the columns left to right, skipping columns still covered by a
/// row-spanning cell from a row above.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub role: RowRole,
    pub cells: Vec<Cell>,
    pub background: Option<Rgb>,
}

impl Row {
    pub fn new(role: RowRole, cells: Vec<Cell>) -> Self {
        Self {
            role,
            cells,
            background: None,
        }
    }

    pub fn body(cells: Vec<Cell>) -> Self {
        Self::new(RowRole::Body, cells)
    }

    pub fn shaded(self, color: Rgb) -> Self {
        Self {
            background: Some(color),
            ..self
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Padding {
    pub const NONE: Padding = Padding::uniform(0.0);

    pub const fn uniform(v: f32) -> Self {
        Self {
            top: v,
            bottom: v,
            left: v,
            right: v,
        }
    }

    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }
}

/// Lines drawn around every cell.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridLines {
    pub width: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub column_widths: Vec<f32>,
    pub rows: Vec<Row>,
    pub grid: Option<GridLines>,
    pub padding: Padding,
    /// Placement of the whole table inside the frame.
    pub align: Align,
}

/// Where a cell landed in its table's grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement<'a> {
    pub row: usize,
    pub column: usize,
    pub cell: &'a Cell,
}

impl Table {
    pub fn new(column_widths: Vec<f32>) -> Self {
        Self {
            column_widths,
            rows: Vec::new(),
            grid: None,
            padding: Padding::symmetric(3.0, 6.0),
            align: Align::Center,
        }
    }

    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        Self { rows, ..self }
    }

    pub fn with_grid(self, grid: GridLines) -> Self {
        Self {
            grid: Some(grid),
            ..self
        }
    }

    pub fn with_padding(self, padding: Padding) -> Self {
        Self { padding, ..self }
    }

    pub fn width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Resolve column and row spans into grid positions.
    ///
    /// Fails when a row holds more cells than there are free columns.
    pub fn placements(&self) -> Result<Vec<Placement<'_>>, RenderError> {
        let columns = self.column_widths.len();
        let mut covered = vec![0usize; columns];
        let mut placed = Vec::new();

        for (r, row) in self.rows.iter().enumerate() {
            let mut taken = vec![false; columns];
            for (c, remaining) in covered.iter_mut().enumerate() {
                if *remaining > 0 {
                    taken[c] = true;
                    *remaining -= 1;
                }
            }

            let mut column = 0;
            for cell in &row.cells {
                while column < columns && taken[column] {
                    column += 1;
                }
                let end = column + cell.col_span.max(1);
                if end > columns || taken[column..end].iter().any(|t| *t) {
                    return Err(RenderError::layout(format!(
                        "row {r} has more cells than free columns ({columns} columns)"
                    )));
                }
                for c in column..end {
                    taken[c] = true;
                    covered[c] = cell.row_span.max(1) - 1;
                }
                placed.push(Placement {
                    row: r,
                    column,
                    cell,
                });
                column = end;
            }
        }

        Ok(placed)
    }

    /// Width of a cell placed at `column`, spans included.
    pub fn span_width(&self, column: usize, col_span: usize) -> f32 {
        self.column_widths
            .iter()
            .skip(column)
            .take(col_span.max(1))
            .sum()
    }
}

/// A horizontal line across the whole frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rule {
    pub thickness: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Table(Table),
    Paragraph(Paragraph),
    Rule(Rule),
    Spacer(f32),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSetup {
    /// A4 portrait with half-inch margins.
    pub fn a4() -> Self {
        Self {
            width: 595.2756,
            height: 841.8898,
            margin: inch(0.5),
        }
    }

    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn frame_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::a4()
    }
}

/// A complete document flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub page: PageSetup,
    pub blocks: Vec<Block>,
}

impl Layout {
    pub fn new(title: impl Into<String>, page: PageSetup) -> Self {
        Self {
            title: title.into(),
            page,
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> + '_ {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        })
    }
}
