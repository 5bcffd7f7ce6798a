use std::io::Write;
use std::path::Path;

use crate::export::ExportError;
use crate::report::rows::{ReportOptions, SampleRow};

const BASE_COLUMNS: [&str; 2] = ["sample", "runtype"];
const METADATA_COLUMNS: [&str; 2] = ["genome_size", "species"];
const FILE_COLUMNS: [&str; 3] = ["r1", "r2", "extra"];

/// Header columns; metadata columns appear only when a value was configured.
#[must_use]
pub fn columns(options: &ReportOptions) -> Vec<&'static str> {
    let mut columns = BASE_COLUMNS.to_vec();
    if options.has_metadata_columns() {
        columns.extend(METADATA_COLUMNS);
    }
    columns.extend(FILE_COLUMNS);
    columns
}

fn cells(row: &SampleRow, options: &ReportOptions) -> Vec<String> {
    let mut cells = vec![row.sample.clone(), row.runtype.clone()];
    if options.has_metadata_columns() {
        cells.push(row.genome_size.clone().unwrap_or_default());
        cells.push(row.species.clone().unwrap_or_default());
    }
    cells.extend([row.r1.clone(), row.r2.clone(), row.extra.clone()]);
    cells
}

/// Write the header and one line per row.
///
/// # Errors
///
/// Returns `ExportError::Io` if writing fails.
pub fn write_sample_sheet<W: Write>(
    writer: &mut W,
    rows: &[SampleRow],
    options: &ReportOptions,
) -> Result<(), ExportError> {
    writeln!(writer, "{}", columns(options).join("\t"))?;
    for row in rows {
        writeln!(writer, "{}", cells(row, options).join("\t"))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the sample sheet to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns `ExportError::Write` if the file cannot be created or written.
pub fn write_sample_sheet_file(
    path: &Path,
    rows: &[SampleRow],
    options: &ReportOptions,
) -> Result<(), ExportError> {
    let to_write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(to_write_error)?;
    let mut writer = std::io::BufWriter::new(file);
    write_sample_sheet(&mut writer, rows, options).map_err(|e| match e {
        ExportError::Io(source) => to_write_error(source),
        other => other,
    })
}

/// Render the sample sheet as a string
#[must_use]
pub fn render_sample_sheet(rows: &[SampleRow], options: &ReportOptions) -> String {
    let mut text = columns(options).join("\t");
    text.push('\n');
    for row in rows {
        text.push_str(&cells(row, options).join("\t"));
        text.push('\n');
    }
    text
}
