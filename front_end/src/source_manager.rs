use crate::source_location::Span;

/// Holds one Mini source text and the byte offsets where its lines start.
pub struct SourceManager {
    name: String,
    source: String,
    line_starts: Vec<usize>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            name: String::from("<input>"),
            source: String::new(),
            line_starts: vec![0],
        }
    }

    pub fn from_source(content: &str) -> Self {
        let mut manager = Self::new();
        manager.set_source(content);
        manager
    }

    /// Name shown for this source, usually its path.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_source(&mut self, content: &str) {
        self.source = content.to_string();
        self.line_starts = vec![0];

        for (i, c) in content.char_indices() {
            if c == '\n' {
                self.line_starts.push(i + 1);
            }
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get a line by its 1-based number, without the trailing newline.
    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        if line_number == 0 || line_number > self.line_starts.len() {
            return None;
        }

        let start = self.line_starts[line_number - 1];
        let end = self
            .line_starts
            .get(line_number)
            .copied()
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches(['\n', '\r']))
    }

    /// The span's source line, left-trimmed and indented by four spaces, with
    /// a caret line underneath it.
    pub fn get_snippet(&self, span: &Span) -> String {
        let Some(line) = self.get_line(span.start_line) else {
            return String::from("<invalid line number>");
        };

        let trimmed = line.trim_start();
        let indent = line.chars().count() - trimmed.chars().count();
        let offset = span.start_column.saturating_sub(1).saturating_sub(indent);

        format!(
            "    {}\n    {}{}",
            trimmed.trim_end(),
            " ".repeat(offset),
            "^".repeat(span.width())
        )
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}
