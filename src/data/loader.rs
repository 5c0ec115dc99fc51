use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::Deserialize;

use super::model::{Frame, Label, MultiIndex};
use super::parse::parse_label;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a frame from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "index": {...}, "columns": {...}, "data": [[...], ...] }`
/// * `.csv`  – multi-row header as written by Pandas `df.to_csv()`
pub fn load_file(path: &Path) -> Result<Frame> {
    let frame = match extension(path).as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            frame_from_json_str(&text)?
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };
    warn_on_duplicate_names(&frame);
    info!(
        "loaded {} ({} rows x {} columns)",
        path.display(),
        frame.shape().0,
        frame.shape().1
    );
    Ok(frame)
}

/// Write a frame in the format implied by the extension.
pub fn save_file(frame: &Frame, path: &Path) -> Result<()> {
    let ext = extension(path);
    if ext != "json" && ext != "csv" {
        bail!("Unsupported file extension: .{ext}");
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    if ext == "json" {
        write_json(frame, file)
    } else {
        write_csv(frame, file)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn warn_on_duplicate_names(frame: &Frame) {
    for (axis, index) in [("row", frame.index()), ("column", frame.columns())] {
        for name in index.duplicate_level_names() {
            warn!("{axis} level name '{name}' occurs more than once; lookups use the outermost");
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (the same layout [`write_json`] produces):
///
/// ```json
/// {
///   "index":   { "names": ["level0", "level1"], "tuples": [["A", "A"], ["A", "B"]] },
///   "columns": { "names": ["field"],            "tuples": [["x"], ["y"]] },
///   "data":    [[0.0, 1.0], [2.0, null]]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct FrameRecord {
    index: IndexRecord,
    columns: IndexRecord,
    data: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct IndexRecord {
    names: Vec<Option<String>>,
    tuples: Vec<Vec<Label>>,
}

impl IndexRecord {
    fn into_index(self, what: &str) -> Result<MultiIndex> {
        MultiIndex::from_tuples(self.tuples, self.names).with_context(|| format!("building {what}"))
    }
}

pub fn frame_from_json_str(text: &str) -> Result<Frame> {
    let record: FrameRecord = serde_json::from_str(text).context("parsing JSON")?;
    let index = record.index.into_index("row index")?;
    let columns = record.columns.into_index("column index")?;
    let rows = record
        .data
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect();
    Frame::new(index, columns, rows).context("building frame")
}

pub fn write_json<W: Write>(frame: &Frame, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, frame).context("writing JSON")
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout for `k` row levels and `m` column levels:
///
/// ```text
/// ,col_level_0,A,A,B      ← k-1 blanks, column level name, labels   (m rows)
/// ,col_level_1,x,y,x
/// level0,level1,,,        ← row level names, blanks
/// A,A,0,1,2               ← k labels, values
/// ```
///
/// `k` is the number of leading blanks in the first row plus one; `m` is the
/// number of rows before the first one with nothing past column `k`.
pub fn read_csv<R: Read>(reader: R) -> Result<Frame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record.iter().map(|c| c.to_string()).collect());
    }

    let first = records.first().context("CSV is empty")?;
    let k = first.iter().take_while(|c| c.trim().is_empty()).count() + 1;
    if k > first.len() {
        bail!("CSV header row is blank");
    }
    let n_cols = first.len() - k;

    let m = records
        .iter()
        .position(|r| r.iter().skip(k).all(|c| c.trim().is_empty()))
        .context("CSV has no row of index level names")?;
    if m == 0 {
        bail!("CSV has no column header rows");
    }

    let name = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());

    let column_names = records[..m].iter().map(|r| name(cell(r, k - 1))).collect();
    let column_tuples = (0..n_cols)
        .map(|c| records[..m].iter().map(|r| parse_label(cell(r, k + c))).collect())
        .collect();
    let columns =
        MultiIndex::from_tuples(column_tuples, column_names).context("building column index")?;

    let row_names = (0..k).map(|i| name(cell(&records[m], i))).collect();
    let mut row_tuples: Vec<Vec<Label>> = Vec::new();
    let mut rows = Vec::new();
    for (row_no, record) in records.iter().enumerate().skip(m + 1) {
        row_tuples.push((0..k).map(|i| parse_label(cell(record, i))).collect());
        let values = (0..n_cols)
            .map(|c| parse_value(cell(record, k + c), row_no, c))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }
    let index = MultiIndex::from_tuples(row_tuples, row_names).context("building row index")?;

    Frame::new(index, columns, rows).context("building frame")
}

fn cell(row: &[String], i: usize) -> &str {
    row.get(i).map(String::as_str).unwrap_or("")
}

fn parse_value(s: &str, row: usize, col: usize) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("CSV row {row}, column {col}: '{s}' is not a number"))
}

pub fn write_csv<W: Write>(frame: &Frame, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let index = frame.index();
    let columns = frame.columns();
    let k = index.depth();

    for (level, col_name) in columns.level_names().iter().enumerate() {
        let mut record = vec![String::new(); k - 1];
        record.push(col_name.clone().unwrap_or_default());
        record.extend(columns.level_values(level).map(label_cell));
        out.write_record(&record).context("writing CSV header")?;
    }

    let mut names: Vec<String> = index
        .level_names()
        .iter()
        .map(|n| n.clone().unwrap_or_default())
        .collect();
    names.extend(std::iter::repeat(String::new()).take(columns.len()));
    out.write_record(&names).context("writing CSV header")?;

    for (pos, row) in frame.rows().into_iter().enumerate() {
        let mut record: Vec<String> = index.key(pos).iter().map(label_cell).collect();
        record.extend(row.into_iter().map(|v| {
            if v.is_nan() {
                String::new()
            } else {
                v.to_string()
            }
        }));
        out.write_record(&record).context("writing CSV row")?;
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}

/// Text for one label cell; finite floats keep a decimal point so they read back as floats.
fn label_cell(label: &Label) -> String {
    match label {
        Label::Null => String::new(),
        Label::Float(v) if v.is_finite() => format!("{v:?}"),
        other => other.to_string(),
    }
}
