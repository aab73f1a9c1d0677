//! Dataset loading and JSON output.

use co2_model::climate::ClimateTable;
use co2_model::record::Record;
use flate2::read::GzDecoder;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Open `path` for reading, decompressing on the fly when it ends in `.gz`.
fn open_input(path: &str) -> anyhow::Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path, e))?;
    let reader = BufReader::new(file);
    let gzipped = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Load emissions records from a CSV (or `.csv.gz`) file.
pub fn load_records(path: &str) -> anyhow::Result<Vec<Record>> {
    let records = Record::from_reader(open_input(path)?)
        .map_err(|e| anyhow::anyhow!("Failed to parse emissions CSV {}: {}", path, e))?;
    info!("Loaded {} records from {}", records.len(), path);
    Ok(records)
}

/// Load the monthly temperature table from a JSON (or `.json.gz`) file.
pub fn load_climate(path: &str) -> anyhow::Result<ClimateTable> {
    let table = ClimateTable::from_reader(open_input(path)?)
        .map_err(|e| anyhow::anyhow!("Failed to parse climate JSON {}: {}", path, e))?;
    info!("Loaded climate data for {} states from {}", table.0.len(), path);
    Ok(table)
}

/// Write `value` as pretty JSON to `output`, or to stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&str>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", path, e))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            writer.flush()?;
            info!("Wrote {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2_model::metric::Metric;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;

    const CSV: &str = "Entity,Code,Year,region,Annual CO₂ emissions\n\
                       France,FRA,2000,Europe,400\n\
                       Japan,JPN,2000,Asia,1200\n";

    #[test]
    fn test_load_plain_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emissions.csv");
        fs::write(&path, CSV).unwrap();
        let records = load_records(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].entity, "Japan");
        assert_eq!(records[1].metric(Metric::Annual), 1200.0);
    }

    #[test]
    fn test_load_gzipped_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emissions.csv.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(CSV.as_bytes()).unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();
        let records = load_records(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code.as_deref(), Some("FRA"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_records("/definitely/not/here.csv").unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn test_load_climate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate.json");
        fs::write(&path, r#"{"arizona":{"2018":{"min ":["1"],"max ":["30"],"mean ":["15"]}}}"#)
            .unwrap();
        let table = load_climate(path.to_str().unwrap()).unwrap();
        assert_eq!(table.years("arizona"), vec![2018]);
    }

    #[test]
    fn test_write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&vec![1, 2, 3], path.to_str()).unwrap();
        let written: Vec<i32> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }
}
