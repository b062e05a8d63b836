//! CSV snapshots of a localization table.
//!
//! A snapshot is a plain CSV file with a `key,<lang1>,<lang2>,...` header
//! and one row per key, RFC-4180 quoted, so values containing commas, quotes,
//! or newlines survive a round trip intact. Export order is lexicographic by
//! key, which keeps the output deterministic and diff-friendly regardless of
//! how the table was built.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{error::Error, table::LocalizationTable};

/// A parsed snapshot, not yet merged into a table.
///
/// Rows keep their input order so that a later duplicate (key, language)
/// pair wins during the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportBatch {
    /// Language codes from the header row, in column order.
    pub languages: Vec<String>,

    /// Data rows in input order.
    pub rows: Vec<ImportRow>,

    /// Rows dropped while parsing for having no key.
    #[serde(default)]
    pub skipped_rows: usize,
}

/// One data row of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportRow {
    pub key: String,

    /// Values positionally aligned with [`ImportBatch::languages`]. A short
    /// row simply carries fewer values; the missing cells are untouched on
    /// merge.
    pub values: Vec<String>,
}

/// Options controlling how a batch merges into a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Register languages from the snapshot header that the table does not
    /// know yet. When `false` (the default), an unknown language fails the
    /// whole merge before any mutation.
    pub allow_new_languages: bool,
}

/// Counters describing what a merge did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// (key, language) cells written.
    pub updated: usize,

    /// Keys created because the snapshot had them and the table did not.
    pub added_keys: usize,

    /// Languages registered because of `allow_new_languages`.
    pub added_languages: usize,

    /// Rows skipped for having no key, both while parsing the batch and
    /// during the merge itself.
    pub skipped_rows: usize,
}

/// Serializes the given group of `table` as CSV into `writer`.
///
/// Fails with [`Error::EmptyExport`] when the group has no keys, and
/// [`Error::UnknownGroup`] when the group does not exist.
pub fn write_snapshot<W: Write>(
    table: &LocalizationTable,
    group_name: &str,
    writer: W,
) -> Result<(), Error> {
    let group = table
        .group(group_name)
        .ok_or_else(|| Error::UnknownGroup(group_name.to_string()))?;
    if group.is_empty() {
        return Err(Error::EmptyExport);
    }

    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["key"];
    header.extend(table.languages().iter().map(String::as_str));
    csv_writer.write_record(&header)?;

    let mut keys: Vec<&String> = group.keys().iter().collect();
    keys.sort();

    for key in keys {
        let mut record = vec![key.as_str()];
        for language in table.languages() {
            let value = group
                .entry(language, key)
                .map(|entry| entry.value.as_str())
                .unwrap_or_default();
            record.push(value);
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the snapshot of a group to `<title>.csv` inside `out_dir` and
/// returns the full output path.
pub fn export_snapshot<P: AsRef<Path>>(
    table: &LocalizationTable,
    group_name: &str,
    title: &str,
    out_dir: P,
) -> Result<PathBuf, Error> {
    let path = out_dir.as_ref().join(format!("{}.csv", title));
    let writer = BufWriter::new(File::create(&path)?);
    write_snapshot(table, group_name, writer)?;
    Ok(path)
}

/// Parses CSV text into an [`ImportBatch`].
///
/// The header's leading `key` column token is dropped, as are empty trailing
/// header fields. Rows without a key are skipped with a warning and counted
/// in [`ImportBatch::skipped_rows`]; extra row fields beyond the header's
/// languages are ignored. Only a structural CSV or I/O failure is an error.
pub fn read_snapshot<R: Read>(reader: R) -> Result<ImportBatch, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let languages: Vec<String> = match records.next() {
        Some(header) => {
            let header = header?;
            header
                .iter()
                .skip_while(|field| field.trim() == "key")
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty())
                .collect()
        }
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for record in records {
        let record = record?;
        let key = record.get(0).unwrap_or_default().trim().to_string();
        if key.is_empty() || record.len() < 2 {
            warn!("skipping snapshot row without a key and values");
            skipped_rows += 1;
            continue;
        }

        let values = (0..languages.len())
            .map_while(|i| record.get(i + 1))
            .map(|field| field.to_string())
            .collect();

        rows.push(ImportRow { key, values });
    }

    Ok(ImportBatch {
        languages,
        rows,
        skipped_rows,
    })
}

/// Reads an [`ImportBatch`] from a CSV file.
pub fn read_snapshot_from<P: AsRef<Path>>(path: P) -> Result<ImportBatch, Error> {
    read_snapshot(File::open(path)?)
}

/// Merges a batch into the active group of `table`.
///
/// Rows apply in input order, so a later duplicate (key, language) pair wins.
/// Existing values are overwritten without conflict detection; keys unknown
/// to the table are created first. Snapshot languages the table does not
/// know fail the merge up front unless
/// [`ImportOptions::allow_new_languages`] is set.
pub fn merge_snapshot(
    table: &mut LocalizationTable,
    batch: &ImportBatch,
    options: ImportOptions,
) -> Result<MergeReport, Error> {
    let mut report = MergeReport {
        skipped_rows: batch.skipped_rows,
        ..MergeReport::default()
    };

    let unknown: Vec<&String> = batch
        .languages
        .iter()
        .filter(|language| !table.has_language(language))
        .collect();
    if !unknown.is_empty() {
        if !options.allow_new_languages {
            return Err(Error::UnknownLanguage(
                unknown
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }
        for language in unknown {
            table.add_language(language);
            report.added_languages += 1;
        }
    }

    for row in &batch.rows {
        if row.key.is_empty() {
            report.skipped_rows += 1;
            continue;
        }
        match table.add_key(&row.key, None) {
            Ok(()) => report.added_keys += 1,
            Err(Error::DuplicateKey(_)) => {}
            Err(err) => return Err(err),
        }
        for (language, value) in batch.languages.iter().zip(&row.values) {
            table.update_value(language, &row.key, value, None)?;
            report.updated += 1;
        }
    }

    Ok(report)
}
