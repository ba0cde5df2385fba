//! Output formatting abstraction for text vs JSON rendering
//!
//! All subcommand output flows through [`OutputWriter`] which handles format switching.
//! This keeps format-specific logic out of command handlers entirely.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Abstraction for writing CLI output in different formats.
///
/// Subcommand handlers call `writer.render(&payload)` where `payload`
/// implements both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let writer = OutputWriter::new(OutputFormat::Json);
    /// writer.render(&report)?;
    /// ```
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to an arbitrary writer.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => {
                payload.render_text(w)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestPayload {
        index: String,
        lines: u32,
        status: Option<u16>,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Index: {}", self.index)?;
            writeln!(w, "Lines: {}", self.lines)?;
            Ok(())
        }
    }

    fn payload() -> TestPayload {
        TestPayload {
            index: "error-logs".to_owned(),
            lines: 42,
            status: None,
        }
    }

    #[test]
    fn test_render_to_text_format() {
        let mut buffer = Vec::new();
        OutputWriter::new(OutputFormat::Text)
            .render_to(&payload(), &mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Index: error-logs"));
        assert!(output.contains("Lines: 42"));
    }

    #[test]
    fn test_render_to_json_format() {
        let mut buffer = Vec::new();
        OutputWriter::new(OutputFormat::Json)
            .render_to(&payload(), &mut buffer)
            .expect("json rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.ends_with('\n'), "json output should end with newline");
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(parsed["index"], "error-logs");
        assert_eq!(parsed["lines"], 42);
        assert!(parsed["status"].is_null(), "None should be null in JSON");
    }

    #[test]
    fn test_render_text_unicode_content() {
        #[derive(Serialize)]
        struct UnicodePayload {
            text: String,
        }

        impl Render for UnicodePayload {
            fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
                writeln!(w, "{}", self.text)
            }
        }

        let mut buffer = Vec::new();
        OutputWriter::new(OutputFormat::Text)
            .render_to(
                &UnicodePayload {
                    text: "메시지: 디스크 부족 🦀".to_owned(),
                },
                &mut buffer,
            )
            .expect("rendering unicode should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("디스크"));
    }
}
