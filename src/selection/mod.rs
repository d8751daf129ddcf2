//! Export selection: which records end up in a document.
//!
//! Selection is a pure function of (records, criteria). It never fails; the
//! worst outcomes are "nothing" or "everything". Output is always in
//! catalogue order (abbreviation text by bytes, then id), whichever branch
//! of the plan was taken.

pub mod filters;
pub mod session;

use tracing::debug;

use crate::record::Abbreviation;
use crate::store::{sort_catalogue, RecordPredicate, RecordStore};
use crate::types::export_bundle::ExportFilterCriteria;

pub use filters::{category_filter, SearchTerm, SelectionPlan};
pub use session::{SelectionSession, SessionError};

/// Select from an in-memory collection.
pub fn select(records: &[Abbreviation], criteria: &ExportFilterCriteria) -> Vec<Abbreviation> {
    let plan = SelectionPlan::from_criteria(criteria);

    let mut selected: Vec<Abbreviation> = records
        .iter()
        .filter(|record| plan.matches(record))
        .cloned()
        .collect();
    sort_catalogue(&mut selected);

    debug!(
        branch = plan.branch(),
        considered = records.len(),
        selected = selected.len(),
        "selection resolved"
    );
    selected
}

/// Select straight from a store, pushing the plan down as the query predicate.
///
/// Equivalent to `select(&store.query_abbreviations(None), criteria)`.
pub fn resolve(store: &dyn RecordStore, criteria: &ExportFilterCriteria) -> Vec<Abbreviation> {
    let plan = SelectionPlan::from_criteria(criteria);

    let mut selected = if plan.is_unconstrained() {
        store.query_abbreviations(None)
    } else {
        let predicate: RecordPredicate<'_> = &|record: &Abbreviation| plan.matches(record);
        store.query_abbreviations(Some(predicate))
    };
    // Do not trust third-party stores with the ordering.
    sort_catalogue(&mut selected);

    debug!(
        branch = plan.branch(),
        selected = selected.len(),
        "selection resolved from store"
    );
    selected
}
