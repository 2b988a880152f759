//! Export of rendered report text to TXT or CSV files.
//!
//! # Invariants
//! - CSV output is UTF-8 with BOM and `;` as delimiter.
//! - A line containing `": "` becomes a two-column record split at the first
//!   occurrence; every other line becomes a one-column record.

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const CSV_DELIMITER: u8 = b';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Csv,
}

impl ExportFormat {
    /// `.csv` (any case) selects CSV; everything else is TXT.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Txt,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "report export failed: {err}"),
            Self::Csv(err) => write!(f, "report export failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Writes report text to `path` in the given format.
///
/// # Side effects
/// - Creates or truncates the target file.
/// - Emits `report_export` logging events.
pub fn export_report(text: &str, path: &Path, format: ExportFormat) -> ExportResult<()> {
    let outcome = File::create(path)
        .map_err(ExportError::from)
        .and_then(|file| match format {
            ExportFormat::Txt => write_txt(text, BufWriter::new(file)),
            ExportFormat::Csv => write_csv(text, BufWriter::new(file)),
        });

    match &outcome {
        Ok(()) => info!(
            "event=report_export module=report status=ok format={} lines={}",
            format.as_str(),
            text.trim_end().lines().count()
        ),
        Err(err) => error!(
            "event=report_export module=report status=error format={} error={err}",
            format.as_str()
        ),
    }
    outcome
}

/// Writes the text with trailing whitespace removed.
pub fn write_txt<W: Write>(text: &str, mut writer: W) -> ExportResult<()> {
    writer.write_all(text.trim_end().as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes the text as `;`-separated CSV preceded by a UTF-8 BOM.
pub fn write_csv<W: Write>(text: &str, mut writer: W) -> ExportResult<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .flexible(true)
        .from_writer(writer);

    for line in text.trim_end().lines() {
        match line.split_once(": ") {
            Some((key, value)) => csv_writer.write_record([key.trim(), value.trim()])?,
            None => csv_writer.write_record([line])?,
        }
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_csv, write_txt, ExportFormat};
    use std::path::Path;

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("r.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("r.txt")), ExportFormat::Txt);
        assert_eq!(ExportFormat::from_path(Path::new("report")), ExportFormat::Txt);
    }

    #[test]
    fn csv_splits_key_value_lines() {
        let mut buffer = Vec::new();
        write_csv("Medal tally (filtered):\n  Gold: 3\n", &mut buffer).unwrap();

        assert!(buffer.starts_with(b"\xEF\xBB\xBF"));
        let body = String::from_utf8(buffer[3..].to_vec()).unwrap();
        assert_eq!(body, "Medal tally (filtered):\nGold;3\n");
    }

    #[test]
    fn txt_trims_trailing_whitespace() {
        let mut buffer = Vec::new();
        write_txt("line\n\n  ", &mut buffer).unwrap();
        assert_eq!(buffer, b"line");
    }
}
