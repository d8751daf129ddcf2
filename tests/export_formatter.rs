use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use abbrev_export::export::{DocumentRenderer, ExportFormatter, PdfRenderer};
use abbrev_export::record::{
    Abbreviation, AbbreviationId, Comment, UserId, UserSummary, Vote, VoteValue,
};
use abbrev_export::types::{
    EchoedFilters, ExportContext, ExportFormat, RenderedDocument, TemplateError,
};
use chrono::{NaiveDate, NaiveDateTime};

fn make_user(id: u64, name: &str) -> UserSummary {
    UserSummary {
        id: UserId::new(id),
        name: name.to_string(),
    }
}

fn make_abbr(id: u64, abbreviation: &str, meaning: &str, category: &str) -> Abbreviation {
    Abbreviation {
        id: AbbreviationId::new(id),
        abbreviation: abbreviation.to_string(),
        meaning: meaning.to_string(),
        description: String::new(),
        category: category.to_string(),
        user: make_user(1, "Ana"),
        votes: Vec::new(),
        comments: Vec::new(),
    }
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

fn pdf_formatter() -> ExportFormatter {
    ExportFormatter::new(Arc::new(PdfRenderer::new()))
}

fn text(document: &RenderedDocument) -> String {
    String::from_utf8_lossy(&document.bytes).into_owned()
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Mutex<Vec<(String, ExportContext)>>,
}

impl DocumentRenderer for RecordingRenderer {
    fn render(&self, template: &str, context: &ExportContext) -> Result<Vec<u8>, TemplateError> {
        self.calls
            .lock()
            .unwrap()
            .push((template.to_string(), context.clone()));
        Ok(b"%PDF-stub".to_vec())
    }
}

struct FailingRenderer;

impl DocumentRenderer for FailingRenderer {
    fn render(&self, _: &str, _: &ExportContext) -> Result<Vec<u8>, TemplateError> {
        Err(TemplateError::Layout("font table exhausted".to_string()))
    }
}

struct PanickingRenderer;

impl DocumentRenderer for PanickingRenderer {
    fn render(&self, _: &str, _: &ExportContext) -> Result<Vec<u8>, TemplateError> {
        panic!("template blew up")
    }
}

struct SlowRenderer(Duration);

impl DocumentRenderer for SlowRenderer {
    fn render(&self, _: &str, _: &ExportContext) -> Result<Vec<u8>, TemplateError> {
        thread::sleep(self.0);
        Ok(Vec::new())
    }
}

#[test]
fn filename_follows_generation_time() {
    let subset = vec![make_abbr(1, "API", "Application Programming Interface", "Tech")];

    let document = pdf_formatter()
        .render(
            &subset,
            ExportFormat::Simple,
            at(2024, 3, 5, 14, 30, 0),
            EchoedFilters::default(),
        )
        .unwrap();

    assert_eq!(document.filename, "abbreviations_2024-03-05_14-30-00.pdf");
    assert_eq!(document.content_type, "application/pdf");
}

#[test]
fn context_carries_count_date_and_echoed_filters() {
    let renderer = Arc::new(RecordingRenderer::default());
    let formatter = ExportFormatter::new(renderer.clone());
    let subset = vec![
        make_abbr(1, "API", "Application Programming Interface", "Tech"),
        make_abbr(3, "HTTP", "Hypertext Transfer Protocol", "Tech"),
    ];
    let filters = EchoedFilters {
        search: Some("pro".to_string()),
        category: Some("Tech".to_string()),
    };

    formatter
        .render(&subset, ExportFormat::Detailed, at(2024, 12, 1, 8, 7, 6), filters.clone())
        .unwrap();

    let calls = renderer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (template, context) = &calls[0];
    assert_eq!(template, "pdf.abbreviations-detailed");
    assert_eq!(context.total_count, 2);
    assert_eq!(context.export_date, "01.12.2024 08:07");
    assert_eq!(context.filters, filters);
    assert_eq!(context.abbreviations, subset);
}

#[test]
fn unknown_or_missing_format_defaults_to_simple() {
    assert_eq!(ExportFormat::parse(None), ExportFormat::Simple);
    assert_eq!(ExportFormat::parse(Some("simple")), ExportFormat::Simple);
    assert_eq!(ExportFormat::parse(Some("pdf")), ExportFormat::Simple);
    assert_eq!(ExportFormat::parse(Some("Detailed")), ExportFormat::Simple);
    assert_eq!(ExportFormat::parse(Some("detailed")), ExportFormat::Detailed);

    let subset = vec![make_abbr(1, "API", "Application Programming Interface", "Tech")];
    let now = at(2024, 3, 5, 14, 30, 0);
    let omitted = pdf_formatter()
        .render(&subset, ExportFormat::parse(None), now, EchoedFilters::default())
        .unwrap();
    let explicit = pdf_formatter()
        .render(&subset, ExportFormat::parse(Some("simple")), now, EchoedFilters::default())
        .unwrap();
    assert_eq!(omitted, explicit);
}

#[test]
fn rendering_is_byte_identical_for_identical_inputs() {
    let mut record = make_abbr(1, "API", "Application Programming Interface", "Tech");
    record.comments.push(Comment {
        id: 1,
        user: make_user(2, "Ivan"),
        content: "Used everywhere".to_string(),
        created_at: at(2024, 1, 1, 0, 0, 0),
    });
    let subset = vec![record];
    let now = at(2024, 3, 5, 14, 30, 0);

    for format in [ExportFormat::Simple, ExportFormat::Detailed] {
        let first = pdf_formatter()
            .render(&subset, format, now, EchoedFilters::default())
            .unwrap();
        let second = pdf_formatter()
            .render(&subset, format, now, EchoedFilters::default())
            .unwrap();
        assert_eq!(first.bytes, second.bytes, "{format} rendering must be deterministic");
        assert_eq!(first.digest(), second.digest());
    }
}

#[test]
fn simple_layout_lists_one_line_per_record() {
    let subset = vec![
        make_abbr(1, "API", "Application Programming Interface", "Tech"),
        make_abbr(2, "CPU", "Central Processing Unit", "Hardware"),
    ];
    let filters = EchoedFilters {
        search: Some("unit".to_string()),
        category: None,
    };

    let document = pdf_formatter()
        .render(&subset, ExportFormat::Simple, at(2024, 3, 5, 14, 30, 0), filters)
        .unwrap();
    let body = text(&document);

    assert!(body.starts_with("%PDF-1.4"));
    assert!(body.ends_with("%%EOF\n"));
    assert!(body.contains("(API - Application Programming Interface [Tech])"));
    assert!(body.contains("(CPU - Central Processing Unit [Hardware])"));
    assert!(body.contains("(Exported: 05.03.2024 14:30)"));
    assert!(body.contains("(Total: 2)"));
    assert!(body.contains("(Search: unit)"));
    assert!(!body.contains("(Category:"));
    assert!(body.contains("(Page 1 / 1)"));
}

#[test]
fn detailed_layout_includes_owner_votes_and_comments() {
    let mut record = make_abbr(1, "API", "Application Programming Interface", "Tech");
    record.description = "Contract between programs".to_string();
    record.votes = vec![
        Vote { user: UserId::new(2), value: VoteValue::Up },
        Vote { user: UserId::new(3), value: VoteValue::Up },
        Vote { user: UserId::new(4), value: VoteValue::Down },
    ];
    record.comments.push(Comment {
        id: 9,
        user: make_user(2, "Željka"),
        content: "Vrlo korisno (hvala)".to_string(),
        created_at: at(2024, 1, 1, 0, 0, 0),
    });

    let document = pdf_formatter()
        .render(&[record], ExportFormat::Detailed, at(2024, 3, 5, 14, 30, 0), EchoedFilters::default())
        .unwrap();
    let body = text(&document);

    assert!(body.contains("(Meaning: Application Programming Interface)"));
    assert!(body.contains("(Description: Contract between programs)"));
    assert!(body.contains("(Added by: Ana)"));
    assert!(body.contains("(Votes: 1 \\(3 cast\\))"));
    assert!(body.contains("(Comments \\(1\\):)"));
    // transliterated and escaped
    assert!(body.contains("(Zeljka: Vrlo korisno \\(hvala\\))"));
}

#[test]
fn large_selections_paginate() {
    let subset: Vec<Abbreviation> = (1..=150)
        .map(|i| make_abbr(i, &format!("A{i:03}"), "Some meaning", "Tech"))
        .collect();

    let document = pdf_formatter()
        .render(&subset, ExportFormat::Simple, at(2024, 3, 5, 14, 30, 0), EchoedFilters::default())
        .unwrap();
    let body = text(&document);

    assert!(!body.contains("/Count 1 >>"));
    assert!(body.contains("(Page 1 / "));
    assert!(body.contains("(A150 - Some meaning [Tech])"));
}

#[test]
fn renderer_error_becomes_render_failure() {
    let formatter = ExportFormatter::new(Arc::new(FailingRenderer));
    let subset = vec![make_abbr(1, "API", "x", "Tech")];

    let failure = formatter
        .render(&subset, ExportFormat::Simple, at(2024, 3, 5, 14, 30, 0), EchoedFilters::default())
        .unwrap_err();

    assert_eq!(failure.message, "layout error: font table exhausted");
}

#[test]
fn renderer_panic_becomes_render_failure() {
    let subset = vec![make_abbr(1, "API", "x", "Tech")];
    let now = at(2024, 3, 5, 14, 30, 0);

    let inline = ExportFormatter::new(Arc::new(PanickingRenderer));
    let failure = inline
        .render(&subset, ExportFormat::Simple, now, EchoedFilters::default())
        .unwrap_err();
    assert!(failure.message.contains("template blew up"));

    let bounded = ExportFormatter::new(Arc::new(PanickingRenderer))
        .with_timeout(Some(Duration::from_secs(5)));
    let failure = bounded
        .render(&subset, ExportFormat::Simple, now, EchoedFilters::default())
        .unwrap_err();
    assert_eq!(failure.message, "renderer worker terminated unexpectedly");
}

#[test]
fn slow_render_times_out() {
    let formatter = ExportFormatter::new(Arc::new(SlowRenderer(Duration::from_millis(500))))
        .with_timeout(Some(Duration::from_millis(20)));
    let subset = vec![make_abbr(1, "API", "x", "Tech")];

    let failure = formatter
        .render(&subset, ExportFormat::Simple, at(2024, 3, 5, 14, 30, 0), EchoedFilters::default())
        .unwrap_err();

    assert_eq!(failure.message, "rendering timed out after 20ms");
}

#[test]
fn bounded_render_matches_inline_render() {
    let subset = vec![make_abbr(1, "API", "Application Programming Interface", "Tech")];
    let now = at(2024, 3, 5, 14, 30, 0);

    let inline = pdf_formatter()
        .render(&subset, ExportFormat::Detailed, now, EchoedFilters::default())
        .unwrap();
    let bounded = pdf_formatter()
        .with_timeout(Some(Duration::from_secs(10)))
        .render(&subset, ExportFormat::Detailed, now, EchoedFilters::default())
        .unwrap();

    assert_eq!(inline, bounded);
}

#[test]
fn unknown_template_is_rejected_by_pdf_renderer() {
    let context = ExportFormatter::build_context(&[], at(2024, 3, 5, 14, 30, 0), EchoedFilters::default());

    let err = PdfRenderer::new().render("pdf.nope", &context).unwrap_err();

    assert_eq!(err, TemplateError::UnknownTemplate("pdf.nope".to_string()));
}
