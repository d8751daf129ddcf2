//! Selection and export engine for an abbreviation catalogue.
//!
//! `abbrev-export` resolves which catalogue records an export contains
//! (explicit ids, or free-text search and category), renders them into a
//! paginated PDF, and classifies the outcome for the transport layer. The
//! selection and rendering steps are deterministic: identical inputs always
//! produce identical outputs, byte-for-byte.

pub mod bootstrap;
pub mod config;
pub mod export;
pub mod logging;
pub mod record;
pub mod selection;
pub mod store;
pub mod types;
