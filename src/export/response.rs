use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::export::handler::ExportRequestHandler;
use crate::record::validation::check_len;
use crate::record::ValidationErrors;
use crate::types::export_bundle::{
    ExportError, ExportErrorKind, ExportFilterCriteria, ExportFormat, RenderedDocument,
};
use crate::types::identifiers::AbbreviationId;

pub const STATUS_OK: u16 = 200;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_UNPROCESSABLE: u16 = 422;
pub const STATUS_SERVER_ERROR: u16 = 500;

const INVALID_DATA: &str = "The given data was invalid.";

/// Export request body as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(default)]
    pub abbreviation_ids: Option<Vec<u64>>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl ExportPayload {
    /// Shape the payload into criteria and a format. The format is never
    /// rejected: unknown values fall back to simple.
    pub fn validate(&self) -> Result<(ExportFilterCriteria, ExportFormat), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut ids = Vec::new();

        for (index, raw) in self.abbreviation_ids.iter().flatten().enumerate() {
            match AbbreviationId::parse(*raw) {
                Ok(id) => ids.push(id),
                Err(e) => errors.push(format!("abbreviation_ids.{index}"), e.to_string()),
            }
        }
        if let Some(search) = &self.search {
            check_len(&mut errors, "search", search);
        }
        if let Some(category) = &self.category {
            check_len(&mut errors, "category", category);
        }
        errors.into_result()?;

        let criteria = ExportFilterCriteria {
            ids,
            search: self.search.clone(),
            category: self.category.clone(),
        };
        Ok((criteria, ExportFormat::parse(self.format.as_deref())))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Transport-neutral response: status code, headers and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ExportResponse {
    pub fn document(document: RenderedDocument) -> Self {
        let headers = vec![
            ("Content-Type".to_string(), document.content_type.clone()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{}\"", document.filename),
            ),
            ("ETag".to_string(), format!("\"{}\"", document.digest())),
        ];
        Self {
            status: STATUS_OK,
            headers,
            body: document.bytes,
        }
    }

    pub fn export_error(err: &ExportError) -> Self {
        let status = match err.kind() {
            ExportErrorKind::EmptySelection => STATUS_NOT_FOUND,
            ExportErrorKind::RenderError => STATUS_SERVER_ERROR,
        };
        Self::json_error(status, &err.to_string(), None)
    }

    pub fn validation_error(errors: &ValidationErrors) -> Self {
        Self::json_error(STATUS_UNPROCESSABLE, INVALID_DATA, Some(errors.by_field()))
    }

    fn json_error(
        status: u16,
        message: &str,
        errors: Option<BTreeMap<String, Vec<String>>>,
    ) -> Self {
        let body = ErrorBody {
            status: "error",
            message,
            errors,
        };
        let bytes = serde_json::to_vec(&body)
            .unwrap_or_else(|_| br#"{"status":"error"}"#.to_vec());
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: bytes,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl ExportRequestHandler {
    /// Validate, export and shape the outcome for the transport layer.
    pub fn respond(&self, payload: &ExportPayload) -> ExportResponse {
        let (criteria, format) = match payload.validate() {
            Ok(shaped) => shaped,
            Err(errors) => return ExportResponse::validation_error(&errors),
        };

        match self.handle_export(&criteria, format) {
            Ok(document) => ExportResponse::document(document),
            Err(err) => ExportResponse::export_error(&err),
        }
    }
}
