use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::record::Abbreviation;
use crate::types::identifiers::AbbreviationId;

/// What the client asked to export.
///
/// A non-empty `ids` list takes exclusive precedence: `search` and `category`
/// are then ignored, never combined with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFilterCriteria {
    #[serde(default)]
    pub ids: Vec<AbbreviationId>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ExportFilterCriteria {
    /// No constraint: the whole catalogue.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AbbreviationId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The filter values echoed into the rendered document.
    pub fn echoed(&self) -> EchoedFilters {
        EchoedFilters {
            search: self.search.clone(),
            category: self.category.clone(),
        }
    }
}

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Simple,
    Detailed,
}

impl ExportFormat {
    pub const SIMPLE_TEMPLATE: &'static str = "pdf.abbreviations-simple";
    pub const DETAILED_TEMPLATE: &'static str = "pdf.abbreviations-detailed";

    /// `"detailed"` selects the detailed layout; anything else, including no
    /// value at all, falls back to simple.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("detailed") => ExportFormat::Detailed,
            _ => ExportFormat::Simple,
        }
    }

    pub fn template_name(self) -> &'static str {
        match self {
            ExportFormat::Simple => Self::SIMPLE_TEMPLATE,
            ExportFormat::Detailed => Self::DETAILED_TEMPLATE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Simple => "simple",
            ExportFormat::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One export action: resolved criteria, layout and the moment it was issued.
/// Lives for a single request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub criteria: ExportFilterCriteria,
    pub format: ExportFormat,
    pub generated_at: NaiveDateTime,
}

/// Filter values shown on the document for reference only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedFilters {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Data handed to the templating collaborator. Field order is part of the
/// contract with templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportContext {
    pub abbreviations: Vec<Abbreviation>,
    pub export_date: String,
    pub total_count: usize,
    pub filters: EchoedFilters,
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    pub const PDF_CONTENT_TYPE: &'static str = "application/pdf";

    /// Content hash, `sha256:<hex>`.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Errors raised by a templating collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("{0}")]
    Other(String),
}

/// Rendering failed; no partial document exists. The message keeps the
/// underlying cause for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderFailure {
    pub message: String,
}

impl RenderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TemplateError> for RenderFailure {
    fn from(err: TemplateError) -> Self {
        RenderFailure::new(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportErrorKind {
    EmptySelection,
    RenderError,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("No abbreviations found for export")]
    EmptySelection,

    #[error("Failed to generate PDF: {0}")]
    RenderError(String),
}

impl ExportError {
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::EmptySelection => ExportErrorKind::EmptySelection,
            ExportError::RenderError(_) => ExportErrorKind::RenderError,
        }
    }
}

impl From<RenderFailure> for ExportError {
    fn from(failure: RenderFailure) -> Self {
        ExportError::RenderError(failure.message)
    }
}
