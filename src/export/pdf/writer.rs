// Minimal PDF 1.4 object writer.
// Objects must be written in ascending number order starting at 1.

use std::fmt::Write as _;

pub(crate) struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    pub(crate) fn new() -> Self {
        let mut buf = Vec::with_capacity(16 * 1024);
        buf.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker so transports treat the file as binary.
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    pub(crate) fn next_number(&self) -> usize {
        self.offsets.len() + 1
    }

    pub(crate) fn object(&mut self, number: usize, body: &str) {
        debug_assert_eq!(number, self.next_number(), "objects written out of order");
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    pub(crate) fn stream(&mut self, number: usize, data: &[u8]) {
        debug_assert_eq!(number, self.next_number(), "objects written out of order");
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(
            format!("{number} 0 obj\n<< /Length {} >>\nstream\n", data.len()).as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    /// Append the cross-reference table and trailer; `root` is the catalog.
    pub(crate) fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut tail = String::new();
        let _ = write!(tail, "xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(tail, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            tail,
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        );

        self.buf.extend_from_slice(tail.as_bytes());
        self.buf
    }
}

/// Fold text into the printable ASCII subset of WinAnsi and escape string
/// delimiters.
pub(crate) fn pdf_string(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut escaped = String::with_capacity(ascii.len() + 2);
    escaped.push('(');
    for c in ascii.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\t' => escaped.push(' '),
            c if c.is_ascii_graphic() || c == ' ' => escaped.push(c),
            _ => {}
        }
    }
    escaped.push(')');
    escaped
}
