// The read side used by selection and export.
// Implementations must hand back fully loaded records in catalogue order.

use std::cmp::Ordering;

use crate::record::Abbreviation;

pub type RecordPredicate<'a> = &'a dyn Fn(&Abbreviation) -> bool;

pub trait RecordStore: Send + Sync {
    /// Records matching `predicate` (all records when `None`), ordered
    /// ascending by abbreviation text.
    fn query_abbreviations(&self, predicate: Option<RecordPredicate<'_>>) -> Vec<Abbreviation>;

    /// Distinct category labels, ascending.
    fn categories(&self) -> Vec<String>;
}

/// Catalogue order: abbreviation text by bytes, then id.
pub fn catalogue_order(a: &Abbreviation, b: &Abbreviation) -> Ordering {
    a.abbreviation
        .as_bytes()
        .cmp(b.abbreviation.as_bytes())
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_catalogue(records: &mut [Abbreviation]) {
    records.sort_by(catalogue_order);

    debug_assert!(records
        .windows(2)
        .all(|w| catalogue_order(&w[0], &w[1]) != Ordering::Greater));
}
