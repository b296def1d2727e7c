use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, OutcomeClass};

// ---------------------------------------------------------------------------
// Column names and schema errors
// ---------------------------------------------------------------------------

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_BOOSTER_CATEGORY,
    COL_CLASS,
];

/// Problems with the shape or values of a launch table.
#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: class must be 0 or 1, got {value}")]
    InvalidClass { row: usize, value: f64 },
    #[error("row {row}: payload mass must be a non-negative number, got {value}")]
    InvalidPayload { row: usize, value: f64 },
    #[error("row {row}: null value in column '{column}'")]
    NullValue { row: usize, column: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the launch table columns (the usual export)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – same column names, any numeric type for mass and class
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} launches from {} ({} sites, {} booster categories)",
        dataset.len(),
        path.display(),
        dataset.sites.len(),
        dataset.booster_categories.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One row as it appears in the source table. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawLaunch {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
    #[serde(rename = "class")]
    class: f64,
}

impl RawLaunch {
    fn into_record(self, row: usize) -> Result<LaunchRecord, DatasetError> {
        Ok(LaunchRecord::new(
            self.launch_site,
            validate_payload(row, self.payload_mass_kg)?,
            self.booster_version_category,
            parse_class(row, self.class)?,
        ))
    }
}

fn validate_payload(row: usize, value: f64) -> Result<f64, DatasetError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DatasetError::InvalidPayload { row, value })
    }
}

/// Class codes may arrive as `1`, `1.0` or `0`; anything else is rejected.
fn parse_class(row: usize, value: f64) -> Result<OutcomeClass, DatasetError> {
    if value.fract() == 0.0 {
        if let Some(class) = OutcomeClass::from_code(value as i64) {
            return Ok(class);
        }
    }
    Err(DatasetError::InvalidClass { row, value })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    load_csv_reader(file)
}

/// Parse a launch table in CSV form from any reader.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DatasetError::MissingColumn(col.to_string()).into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawLaunch>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record(row_no)?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "Booster Version Category": "v1.0",
///     "class": 0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    load_json_str(&text)
}

pub fn load_json_str(text: &str) -> Result<LaunchDataset> {
    let rows: Vec<RawLaunch> = serde_json::from_str(text).context("parsing JSON")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row, raw)| raw.into_record(row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the launch table.
///
/// Mass and class columns may use any numeric Arrow type; they are cast to
/// Float64 before validation. Works with files written by **Pandas** and
/// **Polars**.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| -> Result<Arc<dyn Array>> {
            let idx = schema
                .index_of(name)
                .map_err(|_| DatasetError::MissingColumn(name.to_string()))?;
            Ok(batch.column(idx).clone())
        };

        let sites = cast(&column(COL_LAUNCH_SITE)?, &DataType::Utf8)
            .context("casting launch site column")?;
        let boosters = cast(&column(COL_BOOSTER_CATEGORY)?, &DataType::Utf8)
            .context("casting booster category column")?;
        let masses = cast(&column(COL_PAYLOAD_MASS)?, &DataType::Float64)
            .context("casting payload mass column")?;
        let classes =
            cast(&column(COL_CLASS)?, &DataType::Float64).context("casting class column")?;

        let sites = sites
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected Utf8 launch site column")?;
        let boosters = boosters
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected Utf8 booster category column")?;
        let masses = masses
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64 payload mass column")?;
        let classes = classes
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64 class column")?;

        for i in 0..batch.num_rows() {
            let row = records.len();
            let null_at = |column: &str| DatasetError::NullValue {
                row,
                column: column.to_string(),
            };
            if sites.is_null(i) {
                return Err(null_at(COL_LAUNCH_SITE).into());
            }
            if boosters.is_null(i) {
                return Err(null_at(COL_BOOSTER_CATEGORY).into());
            }
            if masses.is_null(i) {
                return Err(null_at(COL_PAYLOAD_MASS).into());
            }
            if classes.is_null(i) {
                return Err(null_at(COL_CLASS).into());
            }

            records.push(LaunchRecord::new(
                sites.value(i),
                validate_payload(row, masses.value(i))?,
                boosters.value(i),
                parse_class(row, classes.value(i))?,
            ));
        }
    }

    Ok(LaunchDataset::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    const CSV: &str = "\
Flight Number,Launch Site,Mission Outcome,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,Success,0,0.0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,Success,1,525.0,F9 v1.0  B0005,v1.0
3,VAFB SLC-4E,Success,1,9600.0,F9 FT  B1029.1,FT
";

    fn dataset_error(err: &anyhow::Error) -> Option<&DatasetError> {
        err.chain().find_map(|e| e.downcast_ref::<DatasetError>())
    }

    #[test]
    fn csv_with_extra_columns_loads() {
        let ds = load_csv_reader(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(ds.records[1].outcome, OutcomeClass::Success);
        assert_eq!(ds.records[2].payload_mass_kg, 9600.0);
        assert_eq!(ds.records[2].booster_version_category, "FT");
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let csv = "Launch Site,class,Payload Mass (kg)\nCCAFS LC-40,1,500\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(
            dataset_error(&err),
            Some(&DatasetError::MissingColumn(COL_BOOSTER_CATEGORY.into()))
        );
    }

    #[test]
    fn csv_rejects_non_binary_class() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\n\
                   KSC LC-39A,2,500,FT\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(
            dataset_error(&err),
            Some(&DatasetError::InvalidClass { row: 0, value: 2.0 })
        );
    }

    #[test]
    fn csv_rejects_negative_payload() {
        let csv = "Launch Site,class,Payload Mass (kg),Booster Version Category\n\
                   KSC LC-39A,1,500,FT\n\
                   KSC LC-39A,1,-3,FT\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(
            dataset_error(&err),
            Some(&DatasetError::InvalidPayload { row: 1, value: -3.0 })
        );
    }

    #[test]
    fn json_records_load() {
        let text = r#"[
            {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 2490, "Booster Version Category": "FT", "class": 1},
            {"Launch Site": "CCAFS SLC-40", "Payload Mass (kg)": 5300.5, "Booster Version Category": "B4", "class": 0.0, "Flight Number": 7}
        ]"#;
        let ds = load_json_str(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].payload_mass_kg, 2490.0);
        assert_eq!(ds.records[1].outcome, OutcomeClass::Failure);
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("launches.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn load_file_reads_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn load_file_reads_parquet_with_integer_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD_MASS, DataType::Int64, false),
            Field::new(COL_BOOSTER_CATEGORY, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["CCAFS LC-40", "KSC LC-39A"])),
                Arc::new(Int64Array::from(vec![500, 4700])),
                Arc::new(StringArray::from(vec!["v1.1", "FT"])),
                Arc::new(Int64Array::from(vec![0, 1])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].payload_mass_kg, 4700.0);
        assert_eq!(ds.records[1].outcome, OutcomeClass::Success);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "KSC LC-39A"]);
    }
}
