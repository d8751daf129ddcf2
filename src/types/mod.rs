pub mod export_bundle;
pub mod identifiers;

pub use export_bundle::{
    EchoedFilters, ExportContext, ExportError, ExportErrorKind, ExportFilterCriteria,
    ExportFormat, ExportRequest, RenderFailure, RenderedDocument, TemplateError,
};
pub use identifiers::{AbbreviationId, IdentifierError, UserId};
