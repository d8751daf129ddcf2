//! Built-in renderer producing paginated A4 PDF documents.
//!
//! Two templates are understood, matching [`ExportFormat::template_name`]:
//! a one-line-per-record listing and a detailed layout with owner, votes and
//! comments. Output depends only on the context, so equal contexts render to
//! equal bytes.

mod layout;
mod writer;

use std::fmt::Write as _;

use crate::export::renderer::DocumentRenderer;
use crate::types::export_bundle::{ExportContext, ExportFormat, TemplateError};

use layout::{paginate, Line, PageGeometry, PlacedLine};
use writer::{pdf_string, PdfWriter};

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    title: String,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            title: "Abbreviations".to_string(),
        }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading printed at the top of the first page.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn header(&self, context: &ExportContext, heading: String) -> Vec<Line> {
        let mut lines = vec![
            Line::bold(heading, 16.0),
            Line::small(format!("Exported: {}", context.export_date)),
            Line::small(format!("Total: {}", context.total_count)),
        ];
        if let Some(search) = context.filters.search.as_deref().filter(|s| !s.is_empty()) {
            lines.push(Line::small(format!("Search: {search}")));
        }
        if let Some(category) = context.filters.category.as_deref().filter(|c| !c.is_empty()) {
            lines.push(Line::small(format!("Category: {category}")));
        }
        lines.push(Line::spacer());
        lines
    }

    fn simple_lines(&self, context: &ExportContext) -> Vec<Line> {
        let mut lines = self.header(context, self.title.clone());
        for record in &context.abbreviations {
            lines.push(Line::regular(format!(
                "{} - {} [{}]",
                record.abbreviation, record.meaning, record.category
            )));
        }
        lines
    }

    fn detailed_lines(&self, context: &ExportContext) -> Vec<Line> {
        let mut lines = self.header(context, format!("{} (detailed)", self.title));
        for record in &context.abbreviations {
            lines.push(Line::bold(record.abbreviation.clone(), 12.0));
            lines.push(Line::regular(format!("Meaning: {}", record.meaning)));
            lines.push(Line::regular(format!("Category: {}", record.category)));
            if !record.description.trim().is_empty() {
                lines.push(Line::regular(format!("Description: {}", record.description)));
            }
            lines.push(Line::regular(format!("Added by: {}", record.user.name)));
            lines.push(Line::regular(format!(
                "Votes: {} ({} cast)",
                record.vote_score(),
                record.votes.len()
            )));
            if !record.comments.is_empty() {
                lines.push(Line::regular(format!("Comments ({}):", record.comments.len())));
                for comment in &record.comments {
                    lines.push(
                        Line::small(format!("{}: {}", comment.user.name, comment.content))
                            .indented(12.0),
                    );
                }
            }
            lines.push(Line::spacer());
        }
        lines
    }

    fn encode(&self, pages: Vec<Vec<PlacedLine>>, geometry: &PageGeometry) -> Vec<u8> {
        // 1 catalog, 2 page tree, 3-4 fonts, then (page, content) pairs.
        const FIRST_PAGE: usize = 5;
        let page_count = pages.len();
        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", FIRST_PAGE + 2 * i))
            .collect();

        let mut writer = PdfWriter::new();
        writer.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
        writer.object(
            2,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {page_count} >>",
                kids.join(" ")
            ),
        );
        writer.object(
            3,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        writer.object(
            4,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (index, page) in pages.iter().enumerate() {
            let page_number = FIRST_PAGE + 2 * index;
            writer.object(
                page_number,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.0} {:.0}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    geometry.width,
                    geometry.height,
                    page_number + 1
                ),
            );
            let content = page_content(page, index + 1, page_count, geometry);
            writer.stream(page_number + 1, content.as_bytes());
        }

        writer.finish(1)
    }
}

fn page_content(
    page: &[PlacedLine],
    number: usize,
    total: usize,
    geometry: &PageGeometry,
) -> String {
    let mut ops = String::new();
    for placed in page {
        if placed.line.text.is_empty() {
            continue;
        }
        let _ = writeln!(
            ops,
            "BT /{} {:.1} Tf 1 0 0 1 {:.2} {:.2} Tm {} Tj ET",
            placed.line.face.resource(),
            placed.line.size,
            placed.x,
            placed.y,
            pdf_string(&placed.line.text)
        );
    }
    let _ = writeln!(
        ops,
        "BT /F1 8.0 Tf 1 0 0 1 {:.2} {:.2} Tm {} Tj ET",
        geometry.margin,
        geometry.margin / 2.0,
        pdf_string(&format!("Page {number} / {total}"))
    );
    ops
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, template: &str, context: &ExportContext) -> Result<Vec<u8>, TemplateError> {
        let lines = match template {
            ExportFormat::SIMPLE_TEMPLATE => self.simple_lines(context),
            ExportFormat::DETAILED_TEMPLATE => self.detailed_lines(context),
            other => return Err(TemplateError::UnknownTemplate(other.to_string())),
        };

        let geometry = PageGeometry::A4;
        let pages = paginate(lines, &geometry);
        Ok(self.encode(pages, &geometry))
    }
}
