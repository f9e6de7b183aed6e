//! Indented text buffer for generated sources.

const INDENT: &str = "    ";

/// Line-oriented text buffer that tracks the current indentation level.
#[derive(Debug, Default)]
pub struct SourceWriter {
    buffer: String,
    depth: usize,
}

impl SourceWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation.
    ///
    /// Empty lines are written without indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// Writes an empty line.
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Increases the indentation level.
    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Decreases the indentation level.
    pub fn outdent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Writes a braced block around the lines produced by `body`.
    pub fn block(&mut self, body: impl FnOnce(&mut Self)) {
        self.line("{");
        self.indent();
        body(self);
        self.outdent();
        self.line("}");
    }

    /// Consumes the writer and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut w = SourceWriter::new();
        w.line("class A");
        w.block(|w| {
            w.line("int X;");
            w.blank_line();
            w.line("void F()");
            w.block(|w| w.line("return;"));
        });
        w.line("// end");
        assert_eq!(
            w.into_string(),
            "class A\n{\n    int X;\n\n    void F()\n    {\n        return;\n    }\n}\n// end\n"
        );
    }

    #[test]
    fn test_empty_line_has_no_indent() {
        let mut w = SourceWriter::new();
        w.indent();
        w.line("");
        assert_eq!(w.into_string(), "\n");
    }

    #[test]
    fn test_outdent_saturates() {
        let mut w = SourceWriter::new();
        w.outdent();
        w.line("x");
        assert_eq!(w.into_string(), "x\n");
    }
}
