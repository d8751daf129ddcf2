use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDateTime;
use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, warn};

use crate::export::renderer::DocumentRenderer;
use crate::record::Abbreviation;
use crate::types::export_bundle::{
    EchoedFilters, ExportContext, ExportFormat, RenderFailure, RenderedDocument, TemplateError,
};

/// `DD.MM.YYYY HH:MM`, as printed on the document.
pub fn display_timestamp(generated_at: NaiveDateTime) -> String {
    generated_at.format("%d.%m.%Y %H:%M").to_string()
}

/// `abbreviations_<YYYY-MM-DD_HH-mm-ss>.pdf`; unique at one-second resolution.
pub fn export_filename(generated_at: NaiveDateTime) -> String {
    format!("abbreviations_{}.pdf", generated_at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Turns a selected subset into a finished document. Holds no per-request
/// state; one formatter serves any number of concurrent requests.
#[derive(Clone)]
pub struct ExportFormatter {
    renderer: Arc<dyn DocumentRenderer>,
    render_timeout: Option<Duration>,
}

impl ExportFormatter {
    pub fn new(renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self {
            renderer,
            render_timeout: None,
        }
    }

    /// Bound the render step. `None` renders on the calling thread.
    pub fn with_timeout(mut self, render_timeout: Option<Duration>) -> Self {
        self.render_timeout = render_timeout;
        self
    }

    pub fn render_timeout(&self) -> Option<Duration> {
        self.render_timeout
    }

    pub fn build_context(
        subset: &[Abbreviation],
        generated_at: NaiveDateTime,
        filters: EchoedFilters,
    ) -> ExportContext {
        ExportContext {
            abbreviations: subset.to_vec(),
            export_date: display_timestamp(generated_at),
            total_count: subset.len(),
            filters,
        }
    }

    pub fn render(
        &self,
        subset: &[Abbreviation],
        format: ExportFormat,
        generated_at: NaiveDateTime,
        filters: EchoedFilters,
    ) -> Result<RenderedDocument, RenderFailure> {
        let template = format.template_name();
        let context = Self::build_context(subset, generated_at, filters);

        debug!(template, records = context.total_count, "rendering export");

        let bytes = match self.render_timeout {
            Some(timeout) => self.render_on_worker(template, context, timeout)?,
            None => self.render_inline(template, &context)?,
        };

        Ok(RenderedDocument {
            filename: export_filename(generated_at),
            content_type: RenderedDocument::PDF_CONTENT_TYPE.to_string(),
            bytes,
        })
    }

    fn render_inline(
        &self,
        template: &str,
        context: &ExportContext,
    ) -> Result<Vec<u8>, RenderFailure> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.renderer.render(template, context))) {
            Ok(outcome) => outcome.map_err(RenderFailure::from),
            Err(payload) => Err(RenderFailure::new(format!(
                "renderer panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }

    // A timed-out worker is abandoned, not killed; its result is dropped when
    // it eventually finishes.
    fn render_on_worker(
        &self,
        template: &'static str,
        context: ExportContext,
        timeout: Duration,
    ) -> Result<Vec<u8>, RenderFailure> {
        let (tx, rx) = crossbeam_channel::bounded::<Result<Vec<u8>, TemplateError>>(1);
        let renderer = Arc::clone(&self.renderer);

        thread::Builder::new()
            .name("export-render".to_string())
            .spawn(move || {
                let outcome = renderer.render(template, &context);
                let _ = tx.send(outcome);
            })
            .map_err(|e| RenderFailure::new(format!("failed to start renderer worker: {e}")))?;

        match rx.recv_timeout(timeout) {
            Ok(outcome) => outcome.map_err(RenderFailure::from),
            Err(RecvTimeoutError::Timeout) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "render timed out");
                Err(RenderFailure::new(format!(
                    "rendering timed out after {}ms",
                    timeout.as_millis()
                )))
            }
            Err(RecvTimeoutError::Disconnected) => Err(RenderFailure::new(
                "renderer worker terminated unexpectedly",
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn filename_uses_dashed_date_and_time() {
        assert_eq!(
            export_filename(at(14, 30, 0)),
            "abbreviations_2024-03-05_14-30-00.pdf"
        );
    }

    #[test]
    fn display_timestamp_is_day_first_without_seconds() {
        assert_eq!(display_timestamp(at(9, 5, 59)), "05.03.2024 09:05");
    }

    #[test]
    fn panic_message_reads_both_payload_kinds() {
        let s: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(s.as_ref()), "boom");
        let s: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(s.as_ref()), "bang");
    }
}
