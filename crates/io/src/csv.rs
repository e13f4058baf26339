// CSV import/export

use std::path::Path;

use sheetgrid_core::CellRange;
use sheetgrid_engine::Sheet;

use crate::IoError;

/// Render every row and column in bounds as CSV, using displayed values.
/// Fields holding a comma, quote, or newline are quoted with inner quotes
/// doubled. Rows are joined with `\n`, with no trailing newline.
pub fn export_string(sheet: &Sheet) -> Result<String, IoError> {
    let mut lines = Vec::with_capacity(sheet.num_rows);
    for row in 0..sheet.num_rows {
        let record: Vec<String> = (0..sheet.num_cols).map(|col| sheet.display(row, col)).collect();
        lines.push(encode_record(&record)?);
    }
    log::info!(
        "exported sheet '{}' as CSV ({} rows x {} cols)",
        sheet.name,
        sheet.num_rows,
        sheet.num_cols
    );
    Ok(lines.join("\n"))
}

fn encode_record(record: &[String]) -> Result<String, IoError> {
    // The writer quotes a lone empty field; a blank line reads back the same
    if let [only] = record {
        if only.is_empty() {
            return Ok(String::new());
        }
    }
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(record)?;
    let bytes = writer.into_inner().map_err(|e| IoError::Csv(e.to_string()))?;
    let mut line = String::from_utf8(bytes).map_err(|e| IoError::Csv(e.to_string()))?;
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

pub fn export(sheet: &Sheet, path: &Path) -> Result<(), IoError> {
    let content = export_string(sheet)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// File name offered for a CSV download of a document.
pub fn export_file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    if stem.is_empty() {
        "sheet.csv".to_string()
    } else {
        format!("{stem}.csv")
    }
}

/// Byte offsets where each row of `content` starts. Rows split on every
/// newline outside quotes, so a blank line is a row of its own.
fn row_starts(content: &str) -> Vec<u64> {
    let mut starts = vec![0];
    let mut in_quotes = false;
    for (i, b) in content.bytes().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => starts.push(i as u64 + 1),
            _ => {}
        }
    }
    starts
}

/// Write CSV text into `sheet` starting at A1.
///
/// Values are trimmed and written as raw literals over whatever was there;
/// cells outside the imported extent are left alone. A blank line between
/// records imports as an empty row; trailing blank lines add nothing.
/// Bounds grow to fit. Returns the range covered by the import, or None for
/// empty input.
pub fn import_into(sheet: &mut Sheet, content: &str) -> Result<Option<CellRange>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    // The reader skips blank lines, so place each record by where it starts
    let starts = row_starts(content);
    let bytes = content.as_bytes();
    let mut rows: Vec<(usize, csv::StringRecord)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let next = rows.last().map_or(0, |(row, _)| row + 1);
        let row = match record.position() {
            Some(pos) => {
                let mut at = pos.byte() as usize;
                while matches!(bytes.get(at), Some(b'\n' | b'\r')) {
                    at += 1;
                }
                let row = starts.partition_point(|&s| s <= at as u64).saturating_sub(1);
                row.max(next)
            }
            None => next,
        };
        rows.push((row, record));
    }

    let height = rows.last().map_or(0, |(row, _)| row + 1);
    let width = rows.iter().map(|(_, r)| r.len()).max().unwrap_or(0);
    if height == 0 || width == 0 {
        return Ok(None);
    }

    sheet.ensure_size(height, width);
    let mut written = 0;
    for (row, record) in &rows {
        // Skipped blank lines in between are empty single-field rows
        for blank in written..*row {
            sheet.set_value(blank, 0, "");
        }
        for (col, field) in record.iter().enumerate() {
            sheet.set_value(*row, col, field);
        }
        written = row + 1;
    }

    log::info!("imported CSV into '{}' ({} rows x {} cols)", sheet.name, height, width);
    Ok(Some(CellRange::new(0, 0, height - 1, width - 1)))
}

/// Decode file bytes as UTF-8, falling back to Windows-1252 (common for
/// spreadsheet-exported CSVs).
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("CSV is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

pub fn import_file(sheet: &mut Sheet, path: &Path) -> Result<Option<CellRange>, IoError> {
    let bytes = std::fs::read(path)?;
    import_into(sheet, &decode_bytes(bytes))
}
