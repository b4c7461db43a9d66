//! CSV and console output for retained papers.
//!
//! CSV columns follow the record fields. List-valued columns hold a JSON
//! array of strings so the file reads back without loss; missing values are
//! written as empty cells.

use crate::error::{PaperError, Result};
use crate::record::PaperRecord;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV header row, in column order
pub const CSV_COLUMNS: &[&str] = &[
    "PubmedID",
    "Title",
    "Publication Date",
    "Authors",
    "Affiliations",
    "Corresponding Author Email",
];

/// One CSV row
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "PubmedID")]
    pubmed_id: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Publication Date")]
    publication_date: Option<String>,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "Affiliations")]
    affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    corresponding_author_email: Option<String>,
}

impl CsvRow {
    fn from_record(record: &PaperRecord) -> Result<Self> {
        Ok(Self {
            pubmed_id: record.pubmed_id.clone(),
            title: record.title.clone(),
            publication_date: record.publication_date.clone(),
            authors: serde_json::to_string(&record.authors)?,
            affiliations: serde_json::to_string(&record.affiliations)?,
            corresponding_author_email: record.corresponding_author_email.clone(),
        })
    }

    fn into_record(self) -> Result<PaperRecord> {
        Ok(PaperRecord {
            pubmed_id: self.pubmed_id,
            title: self.title,
            publication_date: self.publication_date,
            authors: parse_list(&self.authors)?,
            affiliations: parse_list(&self.affiliations)?,
            corresponding_author_email: self.corresponding_author_email,
        })
    }
}

fn parse_list(cell: &str) -> Result<Vec<String>> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(cell)?)
}

/// Append `.csv` unless the name already ends with it.
pub fn csv_path(filename: &str) -> PathBuf {
    if filename.ends_with(".csv") {
        PathBuf::from(filename)
    } else {
        PathBuf::from(format!("{}.csv", filename))
    }
}

/// Write records as CSV, header row first.
pub fn write_csv<W: Write>(writer: W, records: &[PaperRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_COLUMNS)?;
    for record in records {
        wtr.serialize(CsvRow::from_record(record)?)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Save records to `filename` (with `.csv` enforced) and return the path written.
pub fn save_csv(records: &[PaperRecord], filename: &str) -> Result<PathBuf> {
    let path = csv_path(filename);
    let file = std::fs::File::create(&path)?;
    write_csv(file, records)?;

    info!(path = %path.display(), count = records.len(), "Saved CSV");
    Ok(path)
}

/// Read records back from a CSV file written by [`save_csv`].
///
/// An empty cell reads back as `None`. A field that was present but empty
/// (`Some("")`) is written as an empty cell too, so it comes back as `None`.
pub fn read_csv(path: &Path) -> Result<Vec<PaperRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;

    let headers = rdr.headers()?;
    if headers.iter().ne(CSV_COLUMNS.iter().copied()) {
        return Err(PaperError::Config(format!(
            "Unexpected CSV header in {}: {:?}",
            path.display(),
            headers
        )));
    }

    rdr.deserialize::<CsvRow>()
        .map(|row| row?.into_record())
        .collect()
}

/// Write records to `out` in human-readable form, one at a time.
pub fn print_records<W: Write>(mut out: W, records: &[PaperRecord]) -> Result<()> {
    for record in records {
        writeln!(out, "{}", record)?;
        out.flush()?;
    }
    Ok(())
}

/// Export to a CSV file when `destination` is given, otherwise to stdout.
///
/// Returns the path written, if any.
pub fn export(records: &[PaperRecord], destination: Option<&str>) -> Result<Option<PathBuf>> {
    match destination {
        Some(filename) => {
            let path = save_csv(records, filename)?;
            println!("Results saved to {}.", path.display());
            Ok(Some(path))
        }
        None => {
            print_records(std::io::stdout().lock(), records)?;
            Ok(None)
        }
    }
}
