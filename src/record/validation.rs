use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::identifiers::AbbreviationId;

pub const ABBREVIATION_MAX_CHARS: usize = 50;
pub const MEANING_MAX_CHARS: usize = 255;
pub const CATEGORY_MAX_CHARS: usize = 100;
pub const SEARCH_MAX_CHARS: usize = 255;

pub const DUPLICATE_ABBREVIATION: &str = "This abbreviation already exists.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every rule violation found in one input, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Messages grouped by field, as sent back to clients.
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            grouped
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Input for creating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAbbreviation {
    pub abbreviation: String,
    pub meaning: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
}

/// Partial update: only the fields present are validated and applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl AbbreviationPatch {
    pub fn is_empty(&self) -> bool {
        self.abbreviation.is_none() && self.meaning.is_none() && self.category.is_none()
    }
}

/// Answers whether an abbreviation text is already taken, optionally ignoring
/// one record (the one being updated).
pub trait UniquenessCheck {
    fn abbreviation_taken(&self, text: &str, except: Option<AbbreviationId>) -> bool;
}

impl NewAbbreviation {
    pub fn validate(&self, existing: &dyn UniquenessCheck) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if require(&mut errors, "abbreviation", "Abbreviation", &self.abbreviation) {
            check_abbreviation(&mut errors, &self.abbreviation, None, existing);
        }
        if require(&mut errors, "meaning", "Meaning", &self.meaning) {
            check_len(&mut errors, "meaning", &self.meaning);
        }
        if require(&mut errors, "category", "Category", &self.category) {
            check_len(&mut errors, "category", &self.category);
        }

        errors.into_result()
    }
}

impl AbbreviationPatch {
    pub fn validate(
        &self,
        target: AbbreviationId,
        existing: &dyn UniquenessCheck,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(abbreviation) = &self.abbreviation {
            check_abbreviation(&mut errors, abbreviation, Some(target), existing);
        }
        if let Some(meaning) = &self.meaning {
            check_len(&mut errors, "meaning", meaning);
        }
        if let Some(category) = &self.category {
            check_len(&mut errors, "category", category);
        }

        errors.into_result()
    }
}

fn require(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(field, format!("{label} is required."));
        false
    } else {
        true
    }
}

fn check_abbreviation(
    errors: &mut ValidationErrors,
    value: &str,
    except: Option<AbbreviationId>,
    existing: &dyn UniquenessCheck,
) {
    check_len(errors, "abbreviation", value);
    if existing.abbreviation_taken(value, except) {
        errors.push("abbreviation", DUPLICATE_ABBREVIATION);
    }
}

/// Length limits count characters, not bytes.
pub(crate) fn check_len(errors: &mut ValidationErrors, field: &str, value: &str) {
    let (limit, message) = match field {
        "abbreviation" => (
            ABBREVIATION_MAX_CHARS,
            "Abbreviation may be at most 50 characters.",
        ),
        "meaning" => (MEANING_MAX_CHARS, "Meaning may be at most 255 characters."),
        "category" => (CATEGORY_MAX_CHARS, "Category may be at most 100 characters."),
        "search" => (SEARCH_MAX_CHARS, "Search may be at most 255 characters."),
        _ => return,
    };
    if value.chars().count() > limit {
        errors.push(field, message);
    }
}
