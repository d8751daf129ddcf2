use std::sync::Arc;

use tracing::{error, info, warn};

use crate::export::clock::{Clock, SystemClock};
use crate::export::formatter::ExportFormatter;
use crate::record::Abbreviation;
use crate::selection::resolve;
use crate::store::RecordStore;
use crate::types::export_bundle::{
    ExportError, ExportFilterCriteria, ExportFormat, ExportRequest, RenderedDocument,
};

/// Runs one export: resolve, check emptiness, render, terminate.
///
/// Each call is independent. Nothing is retried and nothing is remembered
/// between calls; the store is only read.
pub struct ExportRequestHandler {
    store: Arc<dyn RecordStore>,
    formatter: ExportFormatter,
    clock: Arc<dyn Clock>,
}

impl ExportRequestHandler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        formatter: ExportFormatter,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            formatter,
            clock,
        }
    }

    pub fn with_system_clock(store: Arc<dyn RecordStore>, formatter: ExportFormatter) -> Self {
        Self::new(store, formatter, Arc::new(SystemClock))
    }

    pub fn handle_export(
        &self,
        criteria: &ExportFilterCriteria,
        format: ExportFormat,
    ) -> Result<RenderedDocument, ExportError> {
        // 1. Resolve
        let subset = resolve(self.store.as_ref(), criteria);

        // 2. Empty selections never reach the formatter
        if subset.is_empty() {
            warn!(format = %format, "export matched no abbreviations");
            return Err(ExportError::EmptySelection);
        }

        // 3. Render
        let request = ExportRequest {
            criteria: criteria.clone(),
            format,
            generated_at: self.clock.now(),
        };
        self.render(&subset, &request)
    }

    // 4. Terminate
    fn render(
        &self,
        subset: &[Abbreviation],
        request: &ExportRequest,
    ) -> Result<RenderedDocument, ExportError> {
        match self.formatter.render(
            subset,
            request.format,
            request.generated_at,
            request.criteria.echoed(),
        ) {
            Ok(document) => {
                info!(
                    records = subset.len(),
                    format = %request.format,
                    filename = %document.filename,
                    bytes = document.len(),
                    "export rendered"
                );
                Ok(document)
            }
            Err(failure) => {
                error!(format = %request.format, cause = %failure, "export rendering failed");
                Err(ExportError::from(failure))
            }
        }
    }
}
