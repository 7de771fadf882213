//! `quotegen` command line.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use quotegen_core::Money;
use quotegen_document::{PdfBackend, RenderBackend, TextBackend};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::request::QuotationRequest;

#[derive(Debug, Parser)]
#[command(name = "quotegen")]
#[command(about = "Generate quotation documents from a list of items", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a quotation for the eligible rows of a request file
    Generate {
        /// Request file (JSON)
        #[arg(long)]
        input: PathBuf,
        /// Exact output path; overrides --output-dir
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory for the generated file; defaults to QUOTEGEN_OUTPUT_DIR
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Issue date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pdf)]
        format: OutputFormat,
    },

    /// Print each row's amount and the grand total
    Totals {
        /// Request file (JSON)
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pdf,
    Text,
}

impl OutputFormat {
    pub fn backend(self) -> Box<dyn RenderBackend> {
        match self {
            OutputFormat::Pdf => Box::new(PdfBackend),
            OutputFormat::Text => Box::new(TextBackend::default()),
        }
    }
}

/// Execute one command, writing human output to `out`.
pub fn run(cli: Cli, config: &AppConfig, out: &mut dyn Write) -> AppResult<()> {
    match cli.command {
        Command::Generate {
            input,
            output,
            output_dir,
            date,
            format,
        } => {
            let session = QuotationRequest::load(&input)?.into_session()?;
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let backend = format.backend();
            let rendered = session.generate(date, &config.template, backend.as_ref())?;

            let path = output.unwrap_or_else(|| {
                output_dir
                    .unwrap_or_else(|| config.output_dir.clone())
                    .join(&rendered.file_name)
            });
            std::fs::write(&path, &rendered.bytes)
                .map_err(|e| AppError::io_at("writing", &path, e))?;
            tracing::info!(path = %path.display(), bytes = rendered.bytes.len(), "quotation written");
            writeln!(out, "{}", path.display()).map_err(|e| AppError::io("writing output", e))
        }
        Command::Totals { input } => {
            let session = QuotationRequest::load(&input)?.into_session()?;
            write_totals(&session, out).map_err(|e| AppError::io("writing output", e))
        }
    }
}

/// What to print when a command fails: the bare message when the input was
/// at fault, the error with its causes otherwise.
pub fn failure_message(err: &AppError) -> String {
    if err.is_user_facing() {
        return err.to_string();
    }
    let mut message = format!("error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = std::error::Error::source(cause);
    }
    message
}

fn write_totals(session: &crate::QuotationSession, out: &mut dyn Write) -> std::io::Result<()> {
    let amounts = session.row_amounts();
    for (i, (item, amount)) in session.ledger().items().iter().zip(&amounts).enumerate() {
        let marker = if item.is_eligible() { ' ' } else { '*' };
        writeln!(
            out,
            "{:>3}{marker} {:<40} Amount: {}",
            i + 1,
            item.description,
            amount.format_with_glyph()
        )?;
    }
    let total: Money = session.grand_total();
    writeln!(out, "Grand Total: {}", total.format_with_glyph())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal::Decimal;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "quotegen", "generate", "--input", "req.json", "--date", "2024-06-01", "--format", "text",
        ])
        .unwrap();
        match cli.command {
            Command::Generate { input, date, format, output, .. } => {
                assert_eq!(input, PathBuf::from("req.json"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert_eq!(format, OutputFormat::Text);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from(["quotegen", "generate", "--input", "r", "--date", "01-06-2024"]).is_err());
    }

    #[test]
    fn validation_failures_print_only_the_message() {
        let err = AppError::from(quotegen_core::DomainError::validation(crate::NO_VALID_ITEMS));
        assert_eq!(failure_message(&err), crate::NO_VALID_ITEMS);
    }

    #[test]
    fn other_failures_print_their_causes() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::io_at("writing", std::path::Path::new("out.pdf"), source);
        assert_eq!(
            failure_message(&err),
            "error: writing out.pdf: denied\n  caused by: denied"
        );
    }

    #[test]
    fn totals_mark_rows_left_off_the_document() {
        let session = crate::QuotationSession::with_items(
            "",
            [
                quotegen_ledger::LineItem::new("Cabinet", Decimal::from(2), Decimal::from(5000)),
                quotegen_ledger::LineItem::blank(),
            ],
        );
        let mut out = Vec::new();
        write_totals(&session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("  1  Cabinet"));
        assert!(lines[0].ends_with("Amount: ₹ 10,000.00"));
        assert!(lines[1].starts_with("  2*"));
        assert_eq!(lines[2], "Grand Total: ₹ 10,000.00");
    }
}
