use std::collections::BTreeSet;

use crate::record::{Abbreviation, AbbreviationId};
use crate::types::export_bundle::ExportFilterCriteria;

/// A usable search term. Blank input never becomes a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    lowered: String,
}

impl SearchTerm {
    /// `None` for empty or whitespace-only input, which means "no search
    /// filter" rather than "match nothing".
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            lowered: raw.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Case-insensitive containment in `haystack`.
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.lowered)
    }

    /// Server-side match: abbreviation, meaning or description.
    pub fn matches(&self, record: &Abbreviation) -> bool {
        self.found_in(&record.abbreviation)
            || self.found_in(&record.meaning)
            || self.found_in(&record.description)
    }
}

/// An empty or whitespace-only category constrains nothing. A filled value
/// is compared as given, untrimmed.
pub fn category_filter(raw: Option<&str>) -> Option<&str> {
    raw.filter(|category| !category.trim().is_empty())
}

/// How a selection is resolved.
///
/// The two arms are exclusive: an explicit id list is never intersected with
/// search or category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPlan {
    ExplicitIds(BTreeSet<AbbreviationId>),
    Filtered {
        search: Option<SearchTerm>,
        category: Option<String>,
    },
}

impl SelectionPlan {
    pub fn from_criteria(criteria: &ExportFilterCriteria) -> Self {
        if !criteria.ids.is_empty() {
            return SelectionPlan::ExplicitIds(criteria.ids.iter().copied().collect());
        }

        SelectionPlan::Filtered {
            search: criteria.search.as_deref().and_then(SearchTerm::parse),
            category: category_filter(criteria.category.as_deref()).map(str::to_string),
        }
    }

    pub fn matches(&self, record: &Abbreviation) -> bool {
        match self {
            SelectionPlan::ExplicitIds(ids) => ids.contains(&record.id),
            SelectionPlan::Filtered { search, category } => {
                let search_ok = search.as_ref().map_or(true, |term| term.matches(record));
                let category_ok = category
                    .as_deref()
                    .map_or(true, |category| record.category == category);
                search_ok && category_ok
            }
        }
    }

    /// True when the plan selects every record.
    pub fn is_unconstrained(&self) -> bool {
        matches!(
            self,
            SelectionPlan::Filtered {
                search: None,
                category: None
            }
        )
    }

    pub fn branch(&self) -> &'static str {
        match self {
            SelectionPlan::ExplicitIds(_) => "explicit_ids",
            SelectionPlan::Filtered { .. } => "filtered",
        }
    }
}
