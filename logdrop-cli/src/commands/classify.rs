//! `logdrop classify` command handler
//!
//! Runs the family classifier over each non-blank line and prints the records.
//! Nothing is indexed and no alerts are published.

use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use logdrop_core::types::LogFamily;
use logdrop_pipeline::{LogClassifier, LogRecord, ParseOutcome};

use crate::cli::ClassifyArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `classify` command.
pub async fn execute(args: ClassifyArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let text = match &args.file {
        Some(path) => read_file(path).await?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let classifier = LogClassifier::new()?;
    let mut report = classify_text(&classifier, &text, args.family);
    report.show_rejected = args.show_rejected;
    info!(
        family = %args.family,
        parsed = report.records.len(),
        rejected = report.rejected.len(),
        "classification finished"
    );

    writer.render(&report)?;
    Ok(())
}

async fn read_file(path: &Path) -> Result<String, CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CliError::Command(format!("input file not found: {}", path.display()))
        } else {
            CliError::Io(e)
        }
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Classify every non-blank line of `text` as `family`.
pub fn classify_text(classifier: &LogClassifier, text: &str, family: LogFamily) -> ClassifyReport {
    let mut report = ClassifyReport {
        family,
        lines: 0,
        records: Vec::new(),
        rejected: Vec::new(),
        show_rejected: false,
    };

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        report.lines += 1;
        match classifier.classify(line, family) {
            ParseOutcome::Parsed(record) => report.records.push(record),
            ParseOutcome::Rejected(reason) => report.rejected.push(RejectedLine {
                line: idx + 1,
                reason: reason.to_string(),
            }),
        }
    }
    report
}

/// Classification result for one input.
#[derive(Serialize)]
pub struct ClassifyReport {
    pub family: LogFamily,
    /// Non-blank lines read.
    pub lines: usize,
    pub records: Vec<LogRecord>,
    pub rejected: Vec<RejectedLine>,
    #[serde(skip)]
    pub show_rejected: bool,
}

/// A line the classifier rejected.
#[derive(Serialize)]
pub struct RejectedLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub reason: String,
}

impl Render for ClassifyReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for record in &self.records {
            writeln!(w, "{record}")?;
        }

        if self.show_rejected {
            for rejected in &self.rejected {
                writeln!(
                    w,
                    "{} line {}: {}",
                    "rejected".yellow(),
                    rejected.line,
                    rejected.reason
                )?;
            }
        }

        writeln!(
            w,
            "{} {} lines, {} parsed, {} rejected",
            self.family.to_string().bold(),
            self.lines,
            self.records.len(),
            self.rejected.len()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "\
[2025-02-09T06:14:09.326787+00:00] message repeated 4 times: [ enforcing rate limit ]

This is not a valid log line
[2025-02-09T06:14:10+00:00] FATAL: out of memory
";

    #[test]
    fn classify_text_counts_and_line_numbers() {
        let classifier = LogClassifier::new().expect("classifier");
        let report = classify_text(&classifier, MIXED, LogFamily::Error);
        assert_eq!(report.lines, 3);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].line, 3);
    }

    #[test]
    fn classify_report_text_lists_records() {
        let classifier = LogClassifier::new().expect("classifier");
        let mut report = classify_text(&classifier, MIXED, LogFamily::Error);
        report.show_rejected = true;

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("enforcing rate limit (x4)"));
        assert!(output.contains("FATAL: out of memory"));
        assert!(output.contains("line 3"));
        assert!(output.contains("3 lines, 2 parsed, 1 rejected"));
    }

    #[test]
    fn classify_report_json_has_typed_records() {
        let classifier = LogClassifier::new().expect("classifier");
        let report = classify_text(
            &classifier,
            "06/Feb/2025:00:39:17 +0000|v1|91.242.95.38|jeremypollock.me|200|56701|127.0.0.1:9002|0.001|0.001|GET / HTTP/1.0",
            LogFamily::StandardAccess,
        );
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["family"], "standard_access");
        assert_eq!(json["records"][0]["type"], "access");
        assert_eq!(json["records"][0]["status"], 200);
        assert!(json.get("show_rejected").is_none());
    }
}
