//! Process configuration read from the environment.

use std::path::{Path, PathBuf};

use quotegen_document::QuotationTemplate;

use crate::error::{AppError, AppResult};

pub const OUTPUT_DIR_ENV: &str = "QUOTEGEN_OUTPUT_DIR";
pub const PROFILE_ENV: &str = "QUOTEGEN_PROFILE";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Where generated files go when no explicit output path is given.
    pub output_dir: PathBuf,
    /// Letterhead and terms printed on every document.
    pub template: QuotationTemplate,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            template: QuotationTemplate::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let output_dir = lookup(OUTPUT_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                tracing::debug!("{OUTPUT_DIR_ENV} not set; writing to the working directory");
                PathBuf::from(".")
            });

        let template = match lookup(PROFILE_ENV) {
            Some(path) if !path.trim().is_empty() => load_profile(Path::new(&path))?,
            _ => QuotationTemplate::default(),
        };

        Ok(Self {
            output_dir,
            template,
        })
    }
}

/// Read a business profile (letterhead and terms) from a JSON file.
///
/// Missing sections keep their defaults.
pub fn load_profile(path: &Path) -> AppResult<QuotationTemplate> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::io_at("reading profile", path, e))?;
    let template = serde_json::from_str(&text)
        .map_err(|e| AppError::config(format!("profile {}: {e}", path.display())))?;
    tracing::info!(profile = %path.display(), "business profile loaded");
    Ok(template)
}
