use crate::types::export_bundle::{ExportContext, TemplateError};

/// Templating collaborator: turns a named template plus context into the
/// binary document. Implementations must be deterministic.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, template: &str, context: &ExportContext) -> Result<Vec<u8>, TemplateError>;
}
