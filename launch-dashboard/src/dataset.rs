// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Launch record table and its one-time loader.
//!
//! The table is read from a local CSV file. When the file does not exist it is
//! fetched once from a fallback URL, validated, and written next to the
//! expected path (tmp file + rename) so later starts stay offline.
//!
//! Parsing goes through Arrow's CSV reader: the schema is inferred from the
//! header, and each required column is cast to the type the dashboard needs.

use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::data::{LaunchRecord, Outcome};

/// Fallback location of the launch records CSV.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv";

/// Local file name the dataset is cached under.
pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";

pub const LAUNCH_SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_MASS_COLUMN: &str = "Payload Mass (kg)";
pub const CLASS_COLUMN: &str = "class";
pub const BOOSTER_CATEGORY_COLUMN: &str = "Booster Version Category";
pub const FLIGHT_NUMBER_COLUMN: &str = "Flight Number";
pub const BOOSTER_VERSION_COLUMN: &str = "Booster Version";

const REQUIRED_COLUMNS: &[&str] = &[
    LAUNCH_SITE_COLUMN,
    PAYLOAD_MASS_COLUMN,
    CLASS_COLUMN,
    BOOSTER_CATEGORY_COLUMN,
];

const CSV_BATCH_SIZE: usize = 8192;

/// Dataset acquisition errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}' could not be read as {expected}")]
    ColumnType {
        column: &'static str,
        expected: &'static str,
    },

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("dataset contains no launch records")]
    Empty,
}

/// Immutable in-memory table of launch records. Never empty.
#[derive(Debug, Clone)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
}

impl LaunchTable {
    /// Build a table from already-parsed records, validating each of them.
    pub fn new(records: Vec<LaunchRecord>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        for (idx, record) in records.iter().enumerate() {
            validate_payload(record.payload_mass_kg, idx + 1)?;
        }

        Ok(Self { records })
    }

    /// Parse a CSV file from disk.
    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_bytes(&bytes)
    }

    /// Parse CSV content held in memory.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, DatasetError> {
        let format = Format::default().with_header(true);
        // Infer over every row: a column may only turn fractional late in the file.
        let (schema, _) = format.infer_schema(Cursor::new(bytes), None)?;

        for &column in REQUIRED_COLUMNS {
            if schema.index_of(column).is_err() {
                return Err(DatasetError::MissingColumn(column));
            }
        }

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_format(format)
            .with_batch_size(CSV_BATCH_SIZE)
            .build(Cursor::new(bytes))?;

        let mut records = Vec::new();
        for batch in reader {
            let batch = batch?;
            let first_row = records.len();
            records.extend(records_from_batch(&batch, first_row)?);
        }

        Self::new(records)
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LaunchRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a LaunchTable {
    type Item = &'a LaunchRecord;
    type IntoIter = std::slice::Iter<'a, LaunchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Where the table came from on this start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSource {
    /// A local copy already existed.
    Local,
    /// The file was fetched from the fallback URL and cached.
    Downloaded { bytes: usize },
}

/// Make sure a valid dataset exists at `path`, downloading it from `url` if absent.
///
/// A file that exists but cannot be parsed is not replaced; the caller
/// surfaces the parse error instead.
pub async fn ensure_dataset(
    path: &Path,
    url: &str,
    timeout: Duration,
) -> Result<DatasetSource, DatasetError> {
    match tokio::fs::File::open(path).await {
        Ok(_) => return Ok(DatasetSource::Local),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(DatasetError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    tracing::info!(path = %path.display(), url, "Dataset not found locally, downloading");

    let download_err = |source: reqwest::Error| DatasetError::Download {
        url: url.to_string(),
        source,
    };
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(download_err)?;
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(download_err)?
        .bytes()
        .await
        .map_err(download_err)?;

    // Reject bad content before it lands on disk.
    LaunchTable::from_csv_bytes(&body)?;

    let io_err = |source: std::io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let tmp_path = download_path(path);
    tokio::fs::write(&tmp_path, &body).await.map_err(io_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(io_err)?;

    tracing::info!(path = %path.display(), bytes = body.len(), "Dataset downloaded");

    Ok(DatasetSource::Downloaded { bytes: body.len() })
}

/// Ensure the dataset exists, then parse it.
pub async fn load_dataset(
    path: &Path,
    url: &str,
    timeout: Duration,
) -> Result<(LaunchTable, DatasetSource), DatasetError> {
    let source = ensure_dataset(path, url, timeout).await?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let table = LaunchTable::from_csv_bytes(&bytes)?;

    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        ?source,
        "Loaded launch records"
    );

    Ok((table, source))
}

fn download_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".download");
    PathBuf::from(name)
}

fn validate_payload(payload_mass_kg: f64, row: usize) -> Result<(), DatasetError> {
    if payload_mass_kg.is_finite() && payload_mass_kg >= 0.0 {
        Ok(())
    } else {
        Err(DatasetError::InvalidRow {
            row,
            reason: format!(
                "payload mass must be a non-negative number, got {}",
                payload_mass_kg
            ),
        })
    }
}

/// Convert one Arrow batch to records. `first_row` is the number of data rows
/// already consumed, used to report 1-based row numbers.
fn records_from_batch(
    batch: &RecordBatch,
    first_row: usize,
) -> Result<Vec<LaunchRecord>, DatasetError> {
    let sites = cast_column(batch, LAUNCH_SITE_COLUMN, &DataType::Utf8)?;
    let sites = downcast::<StringArray>(&sites, LAUNCH_SITE_COLUMN, "text")?;

    let payloads = cast_column(batch, PAYLOAD_MASS_COLUMN, &DataType::Float64)?;
    let payloads = downcast::<Float64Array>(&payloads, PAYLOAD_MASS_COLUMN, "a number")?;

    let classes = cast_column(batch, CLASS_COLUMN, &DataType::Float64)?;
    let classes = downcast::<Float64Array>(&classes, CLASS_COLUMN, "a number")?;

    let categories = cast_column(batch, BOOSTER_CATEGORY_COLUMN, &DataType::Utf8)?;
    let categories = downcast::<StringArray>(&categories, BOOSTER_CATEGORY_COLUMN, "text")?;

    let flight_numbers = optional_column(batch, FLIGHT_NUMBER_COLUMN, &DataType::Int64)?;
    let flight_numbers = flight_numbers
        .as_ref()
        .map(|c| downcast::<Int64Array>(c, FLIGHT_NUMBER_COLUMN, "an integer"))
        .transpose()?;

    let versions = optional_column(batch, BOOSTER_VERSION_COLUMN, &DataType::Utf8)?;
    let versions = versions
        .as_ref()
        .map(|c| downcast::<StringArray>(c, BOOSTER_VERSION_COLUMN, "text"))
        .transpose()?;

    let mut records = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let row = first_row + i + 1;
        let missing = |column: &str| DatasetError::InvalidRow {
            row,
            reason: format!("missing value for '{}'", column),
        };

        if sites.is_null(i) {
            return Err(missing(LAUNCH_SITE_COLUMN));
        }
        if payloads.is_null(i) {
            return Err(missing(PAYLOAD_MASS_COLUMN));
        }
        if classes.is_null(i) {
            return Err(missing(CLASS_COLUMN));
        }
        if categories.is_null(i) {
            return Err(missing(BOOSTER_CATEGORY_COLUMN));
        }

        let payload_mass_kg = payloads.value(i);
        validate_payload(payload_mass_kg, row)?;

        let class = classes.value(i);
        let outcome = (class.fract() == 0.0)
            .then(|| Outcome::from_class(class as i64))
            .flatten()
            .ok_or_else(|| DatasetError::InvalidRow {
                row,
                reason: format!("class must be 0 or 1, got {}", class),
            })?;

        records.push(LaunchRecord {
            launch_site: sites.value(i).to_string(),
            payload_mass_kg,
            outcome,
            booster_category: categories.value(i).to_string(),
            flight_number: flight_numbers
                .filter(|arr| !arr.is_null(i))
                .map(|arr| arr.value(i)),
            booster_version: versions
                .filter(|arr| !arr.is_null(i))
                .map(|arr| arr.value(i).to_string()),
        });
    }

    Ok(records)
}

fn cast_column(
    batch: &RecordBatch,
    column: &'static str,
    to: &DataType,
) -> Result<ArrayRef, DatasetError> {
    let array = batch
        .column_by_name(column)
        .ok_or(DatasetError::MissingColumn(column))?;
    Ok(cast(array, to)?)
}

fn optional_column(
    batch: &RecordBatch,
    column: &'static str,
    to: &DataType,
) -> Result<Option<ArrayRef>, DatasetError> {
    match batch.column_by_name(column) {
        Some(array) => Ok(Some(cast(array, to)?)),
        None => Ok(None),
    }
}

fn downcast<'a, T: 'static>(
    array: &'a ArrayRef,
    column: &'static str,
    expected: &'static str,
) -> Result<&'a T, DatasetError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or(DatasetError::ColumnType { column, expected })
}
