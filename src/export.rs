/// CSV export of the results table
///
/// One row per measurement in ledger order, no index column.

use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::error::Result;
use crate::state::data::MeasurementRecord;

pub const CSV_HEADER: [&str; 8] = [
    "ImageName",
    "Water_R",
    "Water_G",
    "Water_B",
    "Paper_R",
    "Paper_G",
    "Paper_B",
    "Estimated_DOC",
];

/// `rgb_values_<date>.csv`
pub fn file_name(date: NaiveDate) -> String {
    format!("rgb_values_{}.csv", date.format("%Y-%m-%d"))
}

/// File name for an export made today (local time)
pub fn default_file_name() -> String {
    file_name(chrono::Local::now().date_naive())
}

/// Quote a field if it contains a separator, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render rows as CSV text
pub fn to_csv(rows: &[MeasurementRecord]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');

    for row in rows {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            escape_field(&row.image_name),
            row.water.r,
            row.water.g,
            row.water.b,
            row.paper.r,
            row.paper.g,
            row.paper.b,
            row.estimated_doc
        );
    }

    out
}

/// Write the rows to `path` without blocking the caller's thread
pub async fn save_csv(path: PathBuf, rows: Vec<MeasurementRecord>) -> Result<PathBuf> {
    tokio::fs::write(&path, to_csv(&rows)).await?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::PatchStats;

    fn record(name: &str, doc: f64) -> MeasurementRecord {
        MeasurementRecord {
            image_name: name.to_string(),
            water: PatchStats { r: 1, g: 2, b: 150 },
            paper: PatchStats { r: 200, g: 210, b: 50 },
            estimated_doc: doc,
        }
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(file_name(date), "rgb_values_2024-03-07.csv");
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            to_csv(&[]),
            "ImageName,Water_R,Water_G,Water_B,Paper_R,Paper_G,Paper_B,Estimated_DOC\n"
        );
    }

    #[test]
    fn test_rows_in_ledger_order() {
        let csv = to_csv(&[record("b.jpg", 0.5), record("a.jpg", 2.0)]);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "b.jpg,1,2,150,200,210,50,0.5");
        assert_eq!(lines[2], "a.jpg,1,2,150,200,210,50,2");
    }

    #[test]
    fn test_names_are_quoted_when_needed() {
        let csv = to_csv(&[record("lake, \"north\".jpg", 1.0)]);
        assert!(csv.lines().nth(1).unwrap().starts_with("\"lake, \"\"north\"\".jpg\",1,"));
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn test_save_csv() {
        let dir = std::env::temp_dir().join(format!("doc-analyzer-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let target = dir.join(default_file_name());

        let path = block_on(save_csv(target.clone(), vec![record("a.jpg", 1.5)])).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(path, target);
        assert!(written.starts_with("ImageName,"));
        assert!(written.ends_with("a.jpg,1,2,150,200,210,50,1.5\n"));
    }

    #[test]
    fn test_save_csv_into_missing_folder_fails() {
        let path = std::env::temp_dir()
            .join(format!("doc-analyzer-no-dir-{}", std::process::id()))
            .join("out.csv");
        assert!(matches!(block_on(save_csv(path, Vec::new())), Err(crate::Error::Io(_))));
    }
}
