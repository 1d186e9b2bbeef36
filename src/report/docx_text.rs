//! Text extraction from a Word document: every non-empty paragraph, plus the
//! paragraphs inside table cells, in document order. This is the raw material
//! the similarity index is built from.

use std::path::Path;

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild,
    TableRowChild,
};

use crate::errors::{Error, Result};

pub fn extract_text(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::DocumentIo(format!("cannot read {}: {e}", path.display())))?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| Error::DocumentIo(format!("cannot parse {}: {e}", path.display())))?;

    let mut segments = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_paragraph(p, &mut segments),
            DocumentChild::Table(table) => {
                for TableChild::TableRow(row) in &table.rows {
                    for TableRowChild::TableCell(cell) in &row.cells {
                        for content in &cell.children {
                            if let TableCellContent::Paragraph(p) = content {
                                push_paragraph(p, &mut segments);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(segments)
}

fn push_paragraph(paragraph: &Paragraph, segments: &mut Vec<String>) {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    let text = text.trim();
    if !text.is_empty() {
        segments.push(text.to_string());
    }
}
