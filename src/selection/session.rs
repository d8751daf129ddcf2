//! Headless model of the export dialog.
//!
//! The dialog filters locally while the user picks records, then submits only
//! the explicit id list; the server resolves the authoritative selection again.
//! Local search is looser than the server's: it looks at abbreviation and
//! meaning only.

use thiserror::Error;

use crate::record::{Abbreviation, AbbreviationId};
use crate::selection::filters::{category_filter, SearchTerm};
use crate::types::export_bundle::ExportFilterCriteria;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Select at least one abbreviation to export")]
    NothingSelected,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    records: Vec<Abbreviation>,
    categories: Vec<String>,
    search: String,
    category: Option<String>,
    visible: Vec<AbbreviationId>,
    selected: Vec<AbbreviationId>,
}

impl SelectionSession {
    pub fn new(records: Vec<Abbreviation>, categories: Vec<String>) -> Self {
        let mut session = Self {
            records,
            categories,
            ..Self::default()
        };
        session.refilter();
        session
    }

    /// Replace the data after a re-fetch, keeping the current filters and
    /// the selection.
    pub fn refresh(&mut self, records: Vec<Abbreviation>, categories: Vec<String>) {
        self.records = records;
        self.categories = categories;
        self.refilter();
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.refilter();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
        self.refilter();
    }

    /// Records currently shown, in the order they were loaded.
    pub fn visible(&self) -> Vec<&Abbreviation> {
        self.records
            .iter()
            .filter(|record| self.visible.contains(&record.id))
            .collect()
    }

    pub fn visible_ids(&self) -> &[AbbreviationId] {
        &self.visible
    }

    /// Selected ids in the order they were picked.
    pub fn selected_ids(&self) -> &[AbbreviationId] {
        &self.selected
    }

    pub fn toggle(&mut self, id: AbbreviationId) {
        match self.selected.iter().position(|selected| *selected == id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(id),
        }
    }

    pub fn is_selected(&self, id: AbbreviationId) -> bool {
        self.selected.contains(&id)
    }

    /// Clear when everything visible is selected, otherwise select exactly
    /// the visible records.
    pub fn toggle_select_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.visible.clone();
        }
    }

    /// Every visible record is selected. Selections hidden by the current
    /// filters do not count.
    pub fn is_all_selected(&self) -> bool {
        !self.visible.is_empty() && self.visible.iter().all(|id| self.is_selected(*id))
    }

    pub fn is_partially_selected(&self) -> bool {
        self.visible.iter().any(|id| self.is_selected(*id)) && !self.is_all_selected()
    }

    /// Criteria to submit: the explicit id list only.
    pub fn export_criteria(&self) -> Result<ExportFilterCriteria, SessionError> {
        if self.selected.is_empty() {
            return Err(SessionError::NothingSelected);
        }
        Ok(ExportFilterCriteria::with_ids(self.selected.iter().copied()))
    }

    fn refilter(&mut self) {
        let search = SearchTerm::parse(&self.search);
        let category = category_filter(self.category.as_deref());

        self.visible = self
            .records
            .iter()
            .filter(|record| {
                search.as_ref().map_or(true, |term| {
                    term.found_in(&record.abbreviation) || term.found_in(&record.meaning)
                })
            })
            .filter(|record| category.map_or(true, |category| record.category == category))
            .map(|record| record.id)
            .collect();
    }
}
