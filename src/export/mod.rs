//! Export path: formatter, request handler and the pieces they collaborate
//! with (clock, renderer, response shaping).

pub mod clock;
pub mod formatter;
pub mod handler;
pub mod pdf;
pub mod renderer;
pub mod response;

pub use clock::{Clock, FixedClock, SystemClock};
pub use formatter::{display_timestamp, export_filename, ExportFormatter};
pub use handler::ExportRequestHandler;
pub use pdf::PdfRenderer;
pub use renderer::DocumentRenderer;
pub use response::{ExportPayload, ExportResponse};
