use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::info;

use crate::errors::{Error, Result};

const CATEGORY_COL: &str = "Regulation_Category";
const SUBCATEGORY_COL: &str = "Regulation_Subcategory";
const ATTRIBUTE_COL: &str = "Attribute_Name";
const PRODUCT_COL: &str = "Product_Category";

/// One attribute row of the `Data` sheet, with the requirement text for each
/// selected country in table order.
#[derive(Debug, Clone)]
pub struct RegulatoryRow {
    pub category: String,
    pub subcategory: String,
    pub attribute: String,
    pub requirements: Vec<String>,
}

impl RegulatoryRow {
    pub fn requirement(&self, country_idx: usize) -> &str {
        self.requirements
            .get(country_idx)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// The regulatory data table: selected countries plus one row per attribute.
#[derive(Debug, Clone)]
pub struct RegulatoryTable {
    pub countries: Vec<String>,
    pub rows: Vec<RegulatoryRow>,
}

impl RegulatoryTable {
    /// Regulation categories in first-seen order, deduplicated.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.category) {
                seen.push(row.category.clone());
            }
        }
        seen
    }

    pub fn rows_for_category<'a>(&'a self, category: &str) -> Vec<&'a RegulatoryRow> {
        self.rows
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

/// Reader over the input workbook. Sheets and columns are resolved by name;
/// anything missing is a `DataLoad` error, fatal and never retried.
pub struct CompareWorkbook {
    workbook: Xlsx<std::io::BufReader<std::fs::File>>,
    path: String,
}

impl CompareWorkbook {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook(path)
            .map_err(|e| Error::DataLoad(format!("cannot open {}: {e}", path.display())))?;
        info!(path = %path.display(), "workbook opened");
        Ok(CompareWorkbook {
            workbook,
            path: path.display().to_string(),
        })
    }

    fn sheet(&mut self, name: &str) -> Result<calamine::Range<Data>> {
        self.workbook
            .worksheet_range(name)
            .map_err(|e| Error::DataLoad(format!("{}: sheet '{name}': {e}", self.path)))
    }

    /// The two countries to compare, from cells A2/B2 of the `Compare` sheet.
    pub fn compare_pair(&mut self) -> Result<(String, String)> {
        let range = self.sheet("Compare")?;
        let row = range.rows().nth(1).ok_or_else(|| {
            Error::DataLoad(format!("{}: 'Compare' sheet has no data row", self.path))
        })?;
        let left = cell_str(row, 0);
        let right = cell_str(row, 1);
        if left.is_empty() || right.is_empty() {
            return Err(Error::DataLoad(format!(
                "{}: 'Compare' sheet must name two countries in A2/B2",
                self.path
            )));
        }
        Ok((left, right))
    }

    /// The product under analysis, from the `Product` sheet.
    pub fn product(&mut self) -> Result<String> {
        let range = self.sheet("Product")?;
        let mut rows = range.rows();
        let headers = rows
            .next()
            .ok_or_else(|| Error::DataLoad(format!("{}: 'Product' sheet is empty", self.path)))?;
        let idx = find_column(headers, PRODUCT_COL)
            .ok_or_else(|| self.missing_column("Product", PRODUCT_COL))?;
        let row = rows.next().ok_or_else(|| {
            Error::DataLoad(format!("{}: 'Product' sheet has no data row", self.path))
        })?;
        let product = cell_str(row, idx);
        if product.is_empty() {
            return Err(Error::DataLoad(format!(
                "{}: '{PRODUCT_COL}' is empty",
                self.path
            )));
        }
        Ok(product)
    }

    /// Loads the `Data` sheet restricted to the given countries.
    pub fn table_for(&mut self, countries: &[String]) -> Result<RegulatoryTable> {
        self.load_table(Some(countries))
    }

    /// Loads the `Data` sheet with every column after `Attribute_Name`
    /// treated as a country.
    pub fn table_all_countries(&mut self) -> Result<RegulatoryTable> {
        self.load_table(None)
    }

    fn load_table(&mut self, selection: Option<&[String]>) -> Result<RegulatoryTable> {
        let range = self.sheet("Data")?;
        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| Error::DataLoad(format!("{}: 'Data' sheet is empty", self.path)))?
            .iter()
            .map(|c| c.to_string().trim().to_string())
            .collect();

        let category_idx = self.header_index(&headers, CATEGORY_COL)?;
        let subcategory_idx = self.header_index(&headers, SUBCATEGORY_COL)?;
        let attribute_idx = self.header_index(&headers, ATTRIBUTE_COL)?;

        let (countries, country_indices): (Vec<String>, Vec<usize>) = match selection {
            Some(countries) => {
                let mut indices = Vec::with_capacity(countries.len());
                for country in countries {
                    indices.push(self.header_index(&headers, country)?);
                }
                (countries.to_vec(), indices)
            }
            None => headers
                .iter()
                .enumerate()
                .skip(attribute_idx + 1)
                .filter(|(_, name)| !name.is_empty())
                .map(|(i, name)| (name.clone(), i))
                .unzip(),
        };

        if countries.is_empty() {
            return Err(Error::DataLoad(format!(
                "{}: 'Data' sheet has no country columns after '{ATTRIBUTE_COL}'",
                self.path
            )));
        }

        let mut table_rows = Vec::new();
        for row in rows {
            let category = cell_str(row, category_idx);
            let attribute = cell_str(row, attribute_idx);
            if category.is_empty() && attribute.is_empty() {
                continue;
            }
            table_rows.push(RegulatoryRow {
                category,
                subcategory: cell_str(row, subcategory_idx),
                attribute,
                requirements: country_indices.iter().map(|&i| cell_str(row, i)).collect(),
            });
        }

        info!(
            rows = table_rows.len(),
            countries = countries.len(),
            "regulatory data loaded"
        );
        Ok(RegulatoryTable {
            countries,
            rows: table_rows,
        })
    }

    fn header_index(&self, headers: &[String], name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| self.missing_column("Data", name))
    }

    fn missing_column(&self, sheet: &str, column: &str) -> Error {
        Error::DataLoad(format!(
            "{}: sheet '{sheet}' is missing column '{column}'",
            self.path
        ))
    }
}

fn find_column(headers: &[Data], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.to_string().trim() == name)
}

fn cell_str(row: &[Data], idx: usize) -> String {
    row.get(idx)
        .map(|cell| cell.to_string())
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();

        let compare = workbook.add_worksheet();
        compare.set_name("Compare").unwrap();
        compare.write_string(0, 0, "Country1").unwrap();
        compare.write_string(0, 1, "Country2").unwrap();
        compare.write_string(1, 0, "Finland").unwrap();
        compare.write_string(1, 1, "Norway").unwrap();

        let data = workbook.add_worksheet();
        data.set_name("Data").unwrap();
        let headers = [
            "Regulation_Category",
            "Regulation_Subcategory",
            "Attribute_Name",
            "Finland",
            "Norway",
            "Sweden",
        ];
        for (col, header) in headers.iter().enumerate() {
            data.write_string(0, col as u16, *header).unwrap();
        }
        data.write_string(1, 0, "Safety").unwrap();
        data.write_string(1, 1, "Electrical").unwrap();
        data.write_string(1, 2, "Certification").unwrap();
        data.write_string(1, 3, "CE, FI mark").unwrap();
        data.write_string(1, 4, "CE").unwrap();
        data.write_string(1, 5, "CE").unwrap();
        data.write_string(2, 0, "EMC").unwrap();
        data.write_string(2, 1, "Emissions").unwrap();
        data.write_string(2, 2, "Standard").unwrap();
        data.write_string(2, 3, "EN 55014").unwrap();
        data.write_string(2, 4, "EN 55014").unwrap();
        data.write_string(2, 5, "EN 55014").unwrap();

        let product = workbook.add_worksheet();
        product.set_name("Product").unwrap();
        product.write_string(0, 0, "Product_Category").unwrap();
        product.write_string(1, 0, "Cooktop").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn reads_compare_pair_product_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.xlsx");
        write_fixture(&path);

        let mut wb = CompareWorkbook::open(&path).unwrap();
        let (left, right) = wb.compare_pair().unwrap();
        assert_eq!((left.as_str(), right.as_str()), ("Finland", "Norway"));
        assert_eq!(wb.product().unwrap(), "Cooktop");

        let table = wb
            .table_for(&["Finland".to_string(), "Norway".to_string()])
            .unwrap();
        assert_eq!(table.countries, vec!["Finland", "Norway"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].requirement(0), "CE, FI mark");
        assert_eq!(table.rows[0].requirement(1), "CE");
        assert_eq!(table.categories(), vec!["Safety", "EMC"]);
    }

    #[test]
    fn all_country_mode_takes_columns_after_attribute_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.xlsx");
        write_fixture(&path);

        let mut wb = CompareWorkbook::open(&path).unwrap();
        let table = wb.table_all_countries().unwrap();
        assert_eq!(table.countries, vec!["Finland", "Norway", "Sweden"]);
    }

    #[test]
    fn missing_country_column_is_a_data_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.xlsx");
        write_fixture(&path);

        let mut wb = CompareWorkbook::open(&path).unwrap();
        let err = wb.table_for(&["Atlantis".to_string()]).unwrap_err();
        assert!(matches!(err, Error::DataLoad(_)));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn missing_sheet_is_a_data_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_sheets.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Other").unwrap();
        workbook.save(&path).unwrap();

        let mut wb = CompareWorkbook::open(&path).unwrap();
        assert!(matches!(wb.compare_pair(), Err(Error::DataLoad(_))));
    }
}
