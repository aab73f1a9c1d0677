use crate::error::Result;
use crate::metric::{Metric, Metrics};
use crate::region::is_known_region;
use co2_utils::numbers::{coerce, parse_metric, parse_year};
use csv::ReaderBuilder;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// One country-year observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Country or state name.
    pub entity: String,
    /// ISO-style country code, when the dataset has one.
    pub code: Option<String>,
    pub year: i32,
    /// Continent; `None` or `Unknown` when the dataset has no mapping.
    pub region: Option<String>,
    pub metrics: Metrics,
}

/// A CSV row as it appears on disk, before the year is validated.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Entity", default)]
    entity: String,
    #[serde(rename = "Code", default, deserialize_with = "non_blank")]
    code: Option<String>,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(default, deserialize_with = "non_blank")]
    region: Option<String>,
    #[serde(rename = "Annual CO₂ emissions", default, deserialize_with = "lenient_number")]
    annual: Option<f64>,
    #[serde(
        rename = "Annual CO₂ emissions including land-use change",
        default,
        deserialize_with = "lenient_number"
    )]
    including_land_use: Option<f64>,
    #[serde(
        rename = "Annual CO₂ emissions from land-use change",
        default,
        deserialize_with = "lenient_number"
    )]
    land_use: Option<f64>,
    #[serde(
        rename = "Annual CO₂ emissions (per capita)",
        default,
        deserialize_with = "lenient_number"
    )]
    per_capita: Option<f64>,
    #[serde(
        rename = "Emission Density (CO₂/Km²)",
        default,
        deserialize_with = "lenient_number"
    )]
    density: Option<f64>,
}

fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_metric))
}

impl Record {
    pub fn new(entity: &str, year: i32) -> Self {
        Record {
            entity: entity.to_string(),
            code: None,
            year,
            region: None,
            metrics: Metrics::default(),
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.set(metric, Some(value));
        self
    }

    /// Metric value for summing: absent or non-finite readings count as 0.
    pub fn metric(&self, metric: Metric) -> f64 {
        coerce(self.metrics.get(metric))
    }

    pub fn has_known_region(&self) -> bool {
        is_known_region(self.region.as_deref())
    }

    /// Parse a CSV string of emissions rows into records.
    ///
    /// Expected headers: `Entity,Code,Year,region` plus any of the metric
    /// columns (see [`Metric::header`]). Unknown columns are ignored and
    /// missing metric columns read as absent.
    pub fn parse_csv(csv_object: &str) -> Result<Vec<Record>> {
        Record::from_reader(csv_object.as_bytes())
    }

    /// Read records from any CSV source.
    ///
    /// Rows whose year is not an integer are skipped with a warning.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rdr.deserialize::<CsvRow>() {
            let row = row?;
            let Some(year) = parse_year(&row.year) else {
                warn!("skipping row for {:?}: unparseable year {:?}", row.entity, row.year);
                skipped += 1;
                continue;
            };
            records.push(Record {
                entity: row.entity.trim().to_string(),
                code: row.code,
                year,
                region: row.region,
                metrics: Metrics {
                    annual: row.annual,
                    including_land_use: row.including_land_use,
                    land_use: row.land_use,
                    per_capita: row.per_capita,
                    density: row.density,
                },
            });
        }
        debug!("loaded {} records ({} skipped)", records.len(), skipped);
        Ok(records)
    }
}
