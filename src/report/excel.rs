use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::errors::{Error, Result};

/// One compared attribute with the model's verdict.
#[derive(Debug, Clone)]
pub struct ComparisonRecord {
    pub category: String,
    pub subcategory: String,
    pub attribute: String,
    pub left: String,
    pub right: String,
    pub summary: String,
}

/// Writes the per-attribute comparison summary workbook: one header row, one
/// row per compared attribute, saved once at the end.
pub fn write_comparison_summary(
    path: &Path,
    country1: &str,
    country2: &str,
    records: &[ComparisonRecord],
) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet
        .set_name("Summary")
        .map_err(|e| Error::DocumentIo(e.to_string()))?;

    let headers = [
        "Regulation_Category",
        "Regulation_Subcategory",
        "Attribute_Name",
        country1,
        country2,
        "Summary",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| Error::DocumentIo(e.to_string()))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let cells = [
            &record.category,
            &record.subcategory,
            &record.attribute,
            &record.left,
            &record.right,
            &record.summary,
        ];
        for (col, value) in cells.iter().enumerate() {
            sheet
                .write_string(row, col as u16, value.as_str())
                .map_err(|e| Error::DocumentIo(e.to_string()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| Error::DocumentIo(format!("cannot save {}: {e}", path.display())))?;
    info!(path = %path.display(), rows = records.len(), "comparison summary saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Reader, Xlsx};

    #[test]
    fn summary_round_trips_through_a_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.xlsx");

        let records = vec![ComparisonRecord {
            category: "Safety".to_string(),
            subcategory: "Electrical".to_string(),
            attribute: "Certification".to_string(),
            left: "CE, FI mark".to_string(),
            right: "CE".to_string(),
            summary: "Only in Finland: FI mark".to_string(),
        }];
        write_comparison_summary(&path, "Finland", "Norway", &records).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range("Summary").unwrap();
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();

        assert_eq!(rows[0][3], "Finland");
        assert_eq!(rows[1][2], "Certification");
        assert_eq!(rows[1][5], "Only in Finland: FI mark");
    }

    #[test]
    fn unwritable_destination_is_a_document_io_error() {
        let err = write_comparison_summary(
            Path::new("/nonexistent/dir/summary.xlsx"),
            "A",
            "B",
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DocumentIo(_)));
    }
}
