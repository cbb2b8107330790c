use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader as _};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
const CSV_EXTENSION: &str = "csv";

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("spreadsheet source does not exist: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported spreadsheet format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("open workbook: {}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("read csv: {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("list csv workbook: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sheet {sheet:?} not found in {} (available: {})", .path.display(), .available.join(", "))]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    #[error("spreadsheet has no sheets: {}", .path.display())]
    NoSheets { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    fn from_csv_field(field: &str) -> Self {
        if field.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(field.to_owned())
        }
    }

    fn from_workbook(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::Int(v) => Self::Int(*v),
            Data::Float(v) => Self::Float(*v),
            Data::Bool(v) => Self::Bool(*v),
            Data::String(s) if s.trim().is_empty() => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::DateTime(dt) => Self::Float(dt.as_f64()),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell as text. Integral floats render without a fraction.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Int(v) => Some(Cow::Owned(v.to_string())),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => {
                Some(Cow::Owned(format!("{v:.0}")))
            }
            Self::Float(v) => Some(Cow::Owned(v.to_string())),
            Self::Bool(v) => Some(Cow::Owned(v.to_string())),
        }
    }

    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.text()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }

    pub fn as_whole_number(&self) -> Option<u32> {
        match self {
            Self::Int(v) => u32::try_from(*v).ok(),
            Self::Float(v) => float_to_whole(*v),
            Self::Text(s) => {
                let s = s.trim();
                match s.parse::<u32>() {
                    Ok(v) => Some(v),
                    Err(_) => s.parse::<f64>().ok().and_then(float_to_whole),
                }
            }
            Self::Empty | Self::Bool(_) => None,
        }
    }
}

fn float_to_whole(v: f64) -> Option<u32> {
    if !v.is_finite() || v.fract() != 0.0 || v < 0.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v as u32)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, CellValue)>) -> Self {
        let cells = pairs
            .into_iter()
            .map(|(header, value)| (header.to_owned(), value))
            .collect();
        Self { cells }
    }

    /// Unknown columns read as [`CellValue::Empty`].
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Workbook,
    CsvFile,
    CsvDir,
}

fn source_kind(path: &Path) -> Result<SourceKind, SheetError> {
    if !path.exists() {
        return Err(SheetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_dir() {
        return Ok(SourceKind::CsvDir);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some(CSV_EXTENSION) => Ok(SourceKind::CsvFile),
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => Ok(SourceKind::Workbook),
        _ => Err(SheetError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| ext == CSV_EXTENSION || WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}

/// A source is a workbook file, one `.csv` file, or a directory of `.csv`
/// files named after their sheets. `sheet = None` selects the first sheet.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Row>, SheetError> {
    let rows = match source_kind(path)? {
        SourceKind::Workbook => read_workbook_rows(path, sheet)?,
        SourceKind::CsvFile => {
            let name = file_stem(path).unwrap_or_default();
            if let Some(sheet) = sheet
                && sheet != name
            {
                return Err(SheetError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: sheet.to_owned(),
                    available: vec![name],
                });
            }
            read_csv_rows(path)?
        }
        SourceKind::CsvDir => {
            let sheets = csv_dir_sheets(path)?;
            let selected = match sheet {
                Some(sheet) => sheets.iter().find(|(name, _)| name == sheet),
                None => sheets.first(),
            };
            let Some((_, file)) = selected else {
                return Err(match sheet {
                    Some(sheet) => SheetError::SheetNotFound {
                        path: path.to_path_buf(),
                        sheet: sheet.to_owned(),
                        available: sheets.iter().map(|(name, _)| name.clone()).collect(),
                    },
                    None => SheetError::NoSheets {
                        path: path.to_path_buf(),
                    },
                });
            };
            read_csv_rows(file)?
        }
    };

    tracing::debug!(
        path = %path.display(),
        sheet = sheet.unwrap_or("<first>"),
        rows = rows.len(),
        "read sheet"
    );
    Ok(rows)
}

fn read_workbook_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Row>, SheetError> {
    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|source| SheetError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
    let names = workbook.sheet_names();
    let name = match sheet {
        Some(sheet) if names.iter().any(|n| n == sheet) => sheet.to_owned(),
        Some(sheet) => {
            return Err(SheetError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: sheet.to_owned(),
                available: names,
            });
        }
        None => names.first().cloned().ok_or_else(|| SheetError::NoSheets {
            path: path.to_path_buf(),
        })?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|source| SheetError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| CellValue::from_workbook(cell).trimmed_text())
        .collect();

    Ok(rows
        .map(|cells| {
            build_row(
                &headers,
                cells.iter().map(CellValue::from_workbook).collect(),
            )
        })
        .collect())
}

fn read_csv_rows(path: &Path) -> Result<Vec<Row>, SheetError> {
    let csv_err = |source| SheetError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut records = reader.records();
    let Some(header_record) = records.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_record
        .map_err(csv_err)?
        .iter()
        .map(|field| CellValue::from_csv_field(field).trimmed_text())
        .collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_err)?;
        rows.push(build_row(
            &headers,
            record.iter().map(CellValue::from_csv_field).collect(),
        ));
    }
    Ok(rows)
}

// A repeated header keeps its last column.
fn build_row(headers: &[Option<String>], mut values: Vec<CellValue>) -> Row {
    values.resize(headers.len(), CellValue::Empty);
    let cells = headers
        .iter()
        .zip(values)
        .filter_map(|(header, value)| header.as_ref().map(|h| (h.clone(), value)))
        .collect();
    Row { cells }
}

fn csv_dir_sheets(dir: &Path) -> Result<Vec<(String, PathBuf)>, SheetError> {
    let io_err = |source| SheetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut sheets = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(CSV_EXTENSION));
        if !path.is_file() || !is_csv {
            continue;
        }
        if let Some(name) = file_stem(&path) {
            sheets.push((name, path));
        }
    }
    sheets.sort();
    Ok(sheets)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_ledger_xlsx(path: &Path) -> anyhow::Result<()> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let date = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let bought = rust_xlsxwriter::ExcelDateTime::from_ymd(2025, 1, 15)?;

        let purchases = workbook.add_worksheet();
        purchases.set_name("All Purchases")?;
        for (col, header) in ["Series", "Volume #", "Cover", "Item Name", "Date"]
            .into_iter()
            .enumerate()
        {
            purchases.write_string(0, col as u16, header)?;
        }
        purchases.write_string(1, 0, "Robin")?;
        purchases.write_number(1, 1, 1.0)?;
        purchases.write_string(1, 2, "CVR A")?;
        purchases.write_string(1, 3, "Robin #1 Cover A")?;
        purchases.write_datetime_with_format(1, 4, &bought, &date)?;
        purchases.write_string(2, 0, "Robin")?;
        purchases.write_number(2, 1, 2.0)?;
        purchases.write_string(2, 3, "Robin #2")?;
        purchases.write_string(3, 0, "Robin")?;

        let summary = workbook.add_worksheet();
        summary.set_name("Collection Summary")?;
        summary.write_string(0, 0, "Series")?;
        summary.write_string(0, 1, "Volumes Owned")?;
        summary.write_string(1, 0, "Robin")?;
        summary.write_number(1, 1, 5.0)?;

        workbook.save(path)?;
        Ok(())
    }

    #[test]
    fn workbook_rows_keep_numeric_and_blank_cells() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("ledger.xlsx");
        write_ledger_xlsx(&path)?;

        let rows = read_rows(&path, Some("All Purchases"))?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("Volume #"), &CellValue::Float(1.0));
        assert_eq!(rows[0].get("Volume #").as_whole_number(), Some(1));
        assert_eq!(rows[0].get("Date"), &CellValue::Float(45672.0));
        assert_eq!(rows[1].get("Cover"), &CellValue::Empty);
        assert_eq!(rows[1].get("Volume #").as_whole_number(), Some(2));
        assert_eq!(rows[2].get("Volume #"), &CellValue::Empty);
        assert_eq!(rows[2].columns().count(), 5);

        let summary = read_rows(&path, Some("Collection Summary"))?;
        assert_eq!(
            summary[0].get("Volumes Owned").text().as_deref(),
            Some("5")
        );

        assert_eq!(read_rows(&path, None)?.len(), 3);
        Ok(())
    }

    #[test]
    fn workbook_missing_sheet_lists_available_sheets() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("ledger.xlsx");
        write_ledger_xlsx(&path)?;

        let err = read_rows(&path, Some("Nope")).expect_err("sheet must be missing");
        assert!(matches!(err, SheetError::SheetNotFound { ref sheet, .. } if sheet == "Nope"));
        assert!(
            err.to_string()
                .contains("available: All Purchases, Collection Summary")
        );
        Ok(())
    }

    #[test]
    fn workbook_error_and_blank_cells_read_as_empty() {
        assert_eq!(
            CellValue::from_workbook(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Empty
        );
        assert_eq!(
            CellValue::from_workbook(&Data::String("  ".to_owned())),
            CellValue::Empty
        );
        assert_eq!(CellValue::from_workbook(&Data::Int(4)), CellValue::Int(4));
    }

    #[test]
    fn repeated_header_keeps_last_column() {
        let headers = vec![Some("A".to_owned()), None, Some("A".to_owned())];
        let row = build_row(
            &headers,
            vec![
                CellValue::Text("first".to_owned()),
                CellValue::Text("dropped".to_owned()),
                CellValue::Text("last".to_owned()),
            ],
        );
        assert_eq!(row.get("A"), &CellValue::Text("last".to_owned()));
        assert_eq!(row.columns().count(), 1);
    }

    #[test]
    fn csv_dir_reads_named_sheet_with_explicit_empty_cells() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        std::fs::write(
            temp.path().join("Purchases.csv"),
            "Series,Volume #,Cover\nBatman,1,CVR A\nBatman,,\nRobin\n",
        )?;
        std::fs::write(temp.path().join("Summary.csv"), "Series\nBatman\n")?;

        let rows = read_rows(temp.path(), Some("Purchases"))?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("Series"), &CellValue::Text("Batman".to_owned()));
        assert_eq!(rows[1].get("Volume #"), &CellValue::Empty);
        assert_eq!(rows[2].get("Cover"), &CellValue::Empty);
        assert_eq!(rows[2].columns().count(), 3);
        assert_eq!(rows[0].get("Nope"), &CellValue::Empty);

        let first = read_rows(temp.path(), None)?;
        assert_eq!(first.len(), 3);
        assert_eq!(read_rows(temp.path(), Some("Summary"))?.len(), 1);

        Ok(())
    }

    #[test]
    fn missing_sheet_is_an_error() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        std::fs::write(temp.path().join("Only.csv"), "A\n1\n")?;

        let err = read_rows(temp.path(), Some("Other")).expect_err("sheet must be missing");
        assert!(matches!(err, SheetError::SheetNotFound { ref sheet, .. } if sheet == "Other"));
        assert!(err.to_string().contains("available: Only"));
        Ok(())
    }

    #[test]
    fn missing_source_and_unknown_extension_are_errors() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let missing = temp.path().join("missing.xlsx");
        assert!(matches!(
            read_rows(&missing, None),
            Err(SheetError::NotFound { .. })
        ));

        let txt = temp.path().join("notes.txt");
        std::fs::write(&txt, "hello")?;
        assert!(matches!(
            read_rows(&txt, None),
            Err(SheetError::UnsupportedFormat { .. })
        ));
        Ok(())
    }

    #[test]
    fn whole_numbers_parse_from_loose_cells() {
        assert_eq!(CellValue::Int(7).as_whole_number(), Some(7));
        assert_eq!(CellValue::Float(12.0).as_whole_number(), Some(12));
        assert_eq!(CellValue::Float(12.5).as_whole_number(), None);
        assert_eq!(CellValue::Text(" 3 ".to_owned()).as_whole_number(), Some(3));
        assert_eq!(CellValue::Text("4.0".to_owned()).as_whole_number(), Some(4));
        assert_eq!(CellValue::Text("-1".to_owned()).as_whole_number(), None);
        assert_eq!(CellValue::Text("#1".to_owned()).as_whole_number(), None);
        assert_eq!(CellValue::Empty.as_whole_number(), None);
    }

    #[test]
    fn text_renders_integral_floats_without_fraction() {
        assert_eq!(CellValue::Float(17.0).text().as_deref(), Some("17"));
        assert_eq!(CellValue::Int(3).text().as_deref(), Some("3"));
        assert_eq!(CellValue::Text("  ".to_owned()).trimmed_text(), None);
        assert!(CellValue::Text(" ".to_owned()).is_empty());
    }
}
