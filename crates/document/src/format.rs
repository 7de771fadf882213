//! Printed forms of dates and numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// `DD-MM-YYYY`, the date format printed on the document.
pub fn document_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// `YYYYMMDD`, the date format used in file names.
pub fn file_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Quantity or rate as entered, without trailing zeros (`2`, `1.5`, `5000`).
pub fn operand(value: Decimal) -> String {
    value.normalize().to_string()
}
