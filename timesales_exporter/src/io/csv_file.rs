//! CSV rendering and the file sink.
//!
//! Output layout is fixed: the header line `datetime,open,high,low,close,volume`
//! followed by one row per bar in the order received. The header is written
//! verbatim and never quoted, so it is byte-identical whatever the quoting mode.

use std::{
    fmt,
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use async_trait::async_trait;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    io::sink::{
        BufferSnafu, CreateTempSnafu, DataSink, MissingParentSnafu, PersistSnafu, ReadOnlySnafu,
        RenderSnafu, SinkError, TaskSnafu, WriteSnafu,
    },
    models::bar::Bar,
};

/// First line of every output file.
pub const HEADER: &str = "datetime,open,high,low,close,volume";

/// How data fields are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    /// Quote only fields containing a delimiter, quote or line break.
    #[default]
    Necessary,
    /// Quote every data field.
    Always,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid quoting {0:?}: expected `necessary` or `always`")]
pub struct InvalidQuoting(pub String);

impl FromStr for Quoting {
    type Err = InvalidQuoting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "necessary" => Ok(Quoting::Necessary),
            "always" => Ok(Quoting::Always),
            _ => Err(InvalidQuoting(s.to_string())),
        }
    }
}

impl fmt::Display for Quoting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quoting::Necessary => "necessary",
            Quoting::Always => "always",
        })
    }
}

impl From<Quoting> for QuoteStyle {
    fn from(value: Quoting) -> Self {
        match value {
            Quoting::Necessary => QuoteStyle::Necessary,
            Quoting::Always => QuoteStyle::Always,
        }
    }
}

/// Renders the complete CSV document: header, then one row per bar.
pub fn render_csv(bars: &[Bar], quoting: Quoting) -> Result<String, SinkError> {
    let mut buffer = Vec::with_capacity(HEADER.len() + 1 + bars.len() * 64);
    buffer.extend_from_slice(HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(quoting.into())
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for bar in bars {
        writer.write_record(bar.fields()).context(RenderSnafu)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context(BufferSnafu)?;
    String::from_utf8(buffer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        .context(BufferSnafu)
}

/// What a successful [`CsvFileSink`] write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    /// Data rows written, excluding the header.
    pub rows: usize,
}

/// Writes bars to a CSV file, replacing the destination atomically.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
    quoting: Quoting,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>, quoting: Quoting) -> Self {
        Self {
            path: path.into(),
            quoting,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSink for CsvFileSink {
    type Output = WriteSummary;

    async fn write(&self, bars: &[Bar]) -> Result<WriteSummary, SinkError> {
        let document = render_csv(bars, self.quoting)?;
        debug!(bytes = document.len(), "rendered csv document");

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, document.as_bytes()))
            .await
            .context(TaskSnafu)??;

        info!(path = %self.path.display(), rows = bars.len(), "wrote csv");
        Ok(WriteSummary {
            path: self.path.clone(),
            rows: bars.len(),
        })
    }
}

/// Writes `contents` to a temporary file next to `path`, then renames it over
/// `path`. On any error the temporary file is removed and `path` is untouched.
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), SinkError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return MissingParentSnafu { dir }.fail();
    }

    // The rename only needs a writable directory, so check the file itself.
    let existing = fs::metadata(path).ok();
    if existing
        .as_ref()
        .is_some_and(|meta| meta.is_file() && meta.permissions().readonly())
    {
        return ReadOnlySnafu { path }.fail();
    }

    let mut tmp = NamedTempFile::new_in(dir).context(CreateTempSnafu { dir })?;
    tmp.write_all(contents).context(WriteSnafu { path })?;
    tmp.as_file().sync_all().context(WriteSnafu { path })?;

    // Keep the mode of a file we are replacing; temp files start out private.
    if let Some(meta) = existing {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .context(WriteSnafu { path })?;
    }

    tmp.persist(path).context(PersistSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::models::bar::FieldValue;

    fn bar(fields: [&str; 6]) -> Bar {
        Bar {
            timestamp: FieldValue::new(fields[0]),
            open: FieldValue::new(fields[1]),
            high: FieldValue::new(fields[2]),
            low: FieldValue::new(fields[3]),
            close: FieldValue::new(fields[4]),
            volume: FieldValue::new(fields[5]),
        }
    }

    fn example_bar() -> Bar {
        bar(["2024-01-02T09:30", "100.0", "100.5", "99.8", "100.2", "12345"])
    }

    #[test]
    fn header_only_for_zero_bars() {
        for quoting in [Quoting::Necessary, Quoting::Always] {
            assert_eq!(render_csv(&[], quoting).unwrap(), format!("{HEADER}\n"));
        }
    }

    #[test]
    fn always_quoting_matches_reference_layout() {
        let csv = render_csv(&[example_bar()], Quoting::Always).unwrap();
        insta::assert_snapshot!(csv, @r#"
        datetime,open,high,low,close,volume
        "2024-01-02T09:30","100.0","100.5","99.8","100.2","12345"
        "#);
    }

    #[test]
    fn necessary_quoting_leaves_plain_values_bare() {
        let csv = render_csv(&[example_bar()], Quoting::Necessary).unwrap();
        assert_eq!(
            csv,
            "datetime,open,high,low,close,volume\n2024-01-02T09:30,100.0,100.5,99.8,100.2,12345\n"
        );
    }

    #[test]
    fn escapes_delimiters_and_quotes() {
        let csv = render_csv(&[bar(["a,b", "say \"hi\"", "1", "1", "1", "1"])], Quoting::Necessary)
            .unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), r#""a,b","say ""hi""",1,1,1,1"#);
    }

    #[test]
    fn one_line_per_bar_plus_header() {
        let bars: Vec<Bar> = (0..7)
            .map(|i| {
                let ts = format!("2024-01-02T09:{:02}", 30 + i * 5);
                bar([&ts, "1", "2", "0.5", "1.5", "10"])
            })
            .collect();
        let csv = render_csv(&bars, Quoting::Necessary).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), bars.len() + 1);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("2024-01-02T09:30,"));
        assert!(lines[7].starts_with("2024-01-02T10:00,"));
    }

    #[test]
    fn parses_quoting_names() {
        assert_eq!("ALWAYS".parse::<Quoting>().unwrap(), Quoting::Always);
        assert!("minimal".parse::<Quoting>().is_err());
    }

    proptest! {
        #[test]
        fn data_rows_round_trip_through_a_csv_reader(
            rows in prop::collection::vec(prop::array::uniform6("[ -~]{0,12}"), 0..20),
            always in any::<bool>(),
        ) {
            let bars: Vec<Bar> = rows
                .iter()
                .map(|r| bar([&r[0], &r[1], &r[2], &r[3], &r[4], &r[5]]))
                .collect();
            let quoting = if always { Quoting::Always } else { Quoting::Necessary };
            let csv = render_csv(&bars, quoting).unwrap();

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .from_reader(csv.as_bytes());
            let headers = reader.headers().unwrap().clone();
            prop_assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER.split(',').collect::<Vec<_>>());

            let parsed: Vec<Vec<String>> = reader
                .records()
                .map(|r| r.unwrap().iter().map(str::to_string).collect())
                .collect();
            let expected: Vec<Vec<String>> = rows
                .iter()
                .map(|r| r.iter().cloned().collect())
                .collect();
            prop_assert_eq!(parsed, expected);
        }
    }

    #[tokio::test]
    async fn sink_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qqq_intraday.csv");
        fs::write(&path, "stale contents\n").unwrap();

        let sink = CsvFileSink::new(&path, Quoting::Necessary);
        let summary = sink.write(&[example_bar(), example_bar()]).await.unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.path, path);
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.starts_with(HEADER));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1, "no temp files left behind");
    }

    #[tokio::test]
    async fn sink_reports_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = CsvFileSink::new(&path, Quoting::Necessary)
            .write(&[example_bar()])
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::MissingParent { .. }), "{err}");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn sink_fails_when_destination_is_a_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.csv");
        fs::create_dir(&target).unwrap();

        let err = CsvFileSink::new(&target, Quoting::Necessary)
            .write(&[])
            .await
            .unwrap_err();
        assert!(matches!(err, SinkError::Persist { .. }), "{err}");
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn sink_refuses_to_replace_a_read_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "keep me\n").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let err = CsvFileSink::new(&path, Quoting::Necessary)
            .write(&[])
            .await
            .unwrap_err();

        assert!(matches!(err, SinkError::ReadOnly { .. }), "{err}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1, "no temp files left behind");
    }
}
