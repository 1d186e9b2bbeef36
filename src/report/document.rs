use std::fs::File;
use std::path::Path;

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, Start, Style, StyleType,
};
use tracing::info;

use crate::errors::{Error, Result};

const BULLET_NUMBERING: usize = 1;

/// Styled flow document: title, headings, paragraphs, bulleted lists,
/// written sequentially and saved once at the end.
pub struct ReportDocument {
    docx: Docx,
}

impl ReportDocument {
    pub fn new(title: &str) -> Self {
        let docx = Docx::new()
            .add_style(
                Style::new("Title", StyleType::Paragraph)
                    .name("Title")
                    .size(40)
                    .bold(),
            )
            .add_style(
                Style::new("Heading1", StyleType::Paragraph)
                    .name("Heading 1")
                    .size(32)
                    .bold(),
            )
            .add_style(
                Style::new("Heading2", StyleType::Paragraph)
                    .name("Heading 2")
                    .size(28)
                    .bold(),
            )
            .add_style(
                Style::new("Heading3", StyleType::Paragraph)
                    .name("Heading 3")
                    .size(24)
                    .bold(),
            )
            .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("•"),
                    LevelJc::new("left"),
                ),
            ))
            .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING));

        let mut doc = ReportDocument { docx };
        doc.push(Paragraph::new().add_run(Run::new().add_text(title)).style("Title"));
        doc
    }

    pub fn add_heading(&mut self, text: &str, level: u8) {
        let style = match level {
            1 => "Heading1",
            2 => "Heading2",
            _ => "Heading3",
        };
        self.push(Paragraph::new().add_run(Run::new().add_text(text)).style(style));
    }

    pub fn add_paragraph(&mut self, text: &str) {
        // The model answers in multi-line prose; each line becomes its own
        // paragraph so the document keeps the intended breaks.
        for line in text.lines() {
            self.push(Paragraph::new().add_run(Run::new().add_text(line)));
        }
    }

    pub fn add_bullet(&mut self, text: &str) {
        self.push(
            Paragraph::new()
                .add_run(Run::new().add_text(text))
                .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
        );
    }

    fn push(&mut self, paragraph: Paragraph) {
        let docx = std::mem::replace(&mut self.docx, Docx::new());
        self.docx = docx.add_paragraph(paragraph);
    }

    /// Writes the document to `path`. An unwritable destination is a
    /// `DocumentIo` error and the report is lost, nothing is checkpointed.
    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| Error::DocumentIo(format!("cannot create {}: {e}", path.display())))?;
        self.docx
            .build()
            .pack(file)
            .map_err(|e| Error::DocumentIo(format!("cannot write {}: {e}", path.display())))?;
        info!(path = %path.display(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::docx_text::extract_text;

    #[test]
    fn saved_document_round_trips_through_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.docx");

        let mut doc = ReportDocument::new("Compliance Strategy");
        doc.add_heading("Regulatory Scope Summary", 1);
        doc.add_paragraph("This plan covers the following categories:");
        doc.add_bullet("Safety");
        doc.add_bullet("EMC");
        doc.add_paragraph("First line.\nSecond line.");
        doc.save(&path).unwrap();

        let segments = extract_text(&path).unwrap();
        assert!(segments.contains(&"Compliance Strategy".to_string()));
        assert!(segments.contains(&"Regulatory Scope Summary".to_string()));
        assert!(segments.contains(&"Safety".to_string()));
        assert!(segments.contains(&"Second line.".to_string()));
    }

    #[test]
    fn unwritable_destination_is_a_document_io_error() {
        let doc = ReportDocument::new("x");
        let err = doc
            .save(Path::new("/nonexistent/dir/plan.docx"))
            .unwrap_err();
        assert!(matches!(err, Error::DocumentIo(_)));
    }
}
