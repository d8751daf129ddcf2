// Line-oriented layout: text is wrapped to the page width using an average
// glyph width, then poured into fixed-size A4 pages.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
}

impl Face {
    pub(crate) fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    pub text: String,
    pub face: Face,
    pub size: f32,
    pub indent: f32,
}

impl Line {
    pub(crate) fn regular(text: impl Into<String>) -> Self {
        Self::new(text, Face::Regular, 10.0)
    }

    pub(crate) fn bold(text: impl Into<String>, size: f32) -> Self {
        Self::new(text, Face::Bold, size)
    }

    pub(crate) fn small(text: impl Into<String>) -> Self {
        Self::new(text, Face::Regular, 9.0)
    }

    pub(crate) fn spacer() -> Self {
        Self::new("", Face::Regular, 6.0)
    }

    pub(crate) fn indented(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    fn new(text: impl Into<String>, face: Face, size: f32) -> Self {
        Self {
            text: text.into(),
            face,
            size,
            indent: 0.0,
        }
    }

    fn leading(&self) -> f32 {
        self.size * 1.4
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub footer_height: f32,
}

impl PageGeometry {
    pub(crate) const A4: PageGeometry = PageGeometry {
        width: 595.0,
        height: 842.0,
        margin: 50.0,
        footer_height: 20.0,
    };

    fn text_width(&self, indent: f32) -> f32 {
        self.width - 2.0 * self.margin - indent
    }

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    fn bottom(&self) -> f32 {
        self.margin + self.footer_height
    }
}

/// A line with its final baseline position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedLine {
    pub line: Line,
    pub x: f32,
    pub y: f32,
}

/// Helvetica averages roughly half an em per glyph.
fn chars_per_line(geometry: &PageGeometry, line: &Line) -> usize {
    let per_char = line.size * 0.5;
    ((geometry.text_width(line.indent) / per_char).floor() as usize).max(1)
}

/// Greedy word wrap; words longer than a line are split hard.
pub(crate) fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap every line and distribute the result over pages. Always yields at
/// least one page.
pub(crate) fn paginate(lines: Vec<Line>, geometry: &PageGeometry) -> Vec<Vec<PlacedLine>> {
    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut y = geometry.top();

    for line in lines {
        let max_chars = chars_per_line(geometry, &line);
        for text in wrap(&line.text, max_chars) {
            let piece = Line {
                text,
                ..line.clone()
            };
            let leading = piece.leading();
            if y - leading < geometry.bottom() {
                pages.push(Vec::new());
                y = geometry.top();
            }
            y -= leading;
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    x: geometry.margin + piece.indent,
                    y,
                    line: piece,
                });
            }
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_blank_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn paginate_overflows_to_new_page() {
        let lines: Vec<Line> = (0..200).map(|i| Line::regular(format!("row {i}"))).collect();
        let pages = paginate(lines, &PageGeometry::A4);
        assert!(pages.len() > 1);
        let total: usize = pages.iter().map(Vec::len).sum();
        assert_eq!(total, 200);
        for page in &pages {
            for placed in page {
                assert!(placed.y >= PageGeometry::A4.bottom());
            }
        }
    }
}
