use co2_utils::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric column of the emissions dataset.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Fossil CO₂ emissions, tonnes.
    Annual,
    /// Fossil plus land-use change emissions, tonnes.
    IncludingLandUse,
    /// Land-use change emissions only, tonnes.
    LandUse,
    /// Fossil emissions per person, tonnes.
    PerCapita,
    /// Emissions per square kilometre.
    Density,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Annual,
        Metric::IncludingLandUse,
        Metric::LandUse,
        Metric::PerCapita,
        Metric::Density,
    ];

    /// The column header this metric is read from.
    pub fn header(&self) -> &'static str {
        match self {
            Metric::Annual => "Annual CO₂ emissions",
            Metric::IncludingLandUse => "Annual CO₂ emissions including land-use change",
            Metric::LandUse => "Annual CO₂ emissions from land-use change",
            Metric::PerCapita => "Annual CO₂ emissions (per capita)",
            Metric::Density => "Emission Density (CO₂/Km²)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Annual => "annual",
            Metric::IncludingLandUse => "including-land-use",
            Metric::LandUse => "land-use",
            Metric::PerCapita => "per-capita",
            Metric::Density => "density",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted) || m.header() == wanted)
            .ok_or_else(|| ParseError::UnknownMetric(s.to_string()))
    }
}

/// Metric readings of one record. `None` means absent or non-numeric.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub annual: Option<f64>,
    pub including_land_use: Option<f64>,
    pub land_use: Option<f64>,
    pub per_capita: Option<f64>,
    pub density: Option<f64>,
}

impl Metrics {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Annual => self.annual,
            Metric::IncludingLandUse => self.including_land_use,
            Metric::LandUse => self.land_use,
            Metric::PerCapita => self.per_capita,
            Metric::Density => self.density,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::Annual => &mut self.annual,
            Metric::IncludingLandUse => &mut self.including_land_use,
            Metric::LandUse => &mut self.land_use,
            Metric::PerCapita => &mut self.per_capita,
            Metric::Density => &mut self.density,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_from_str() {
        assert_eq!("annual".parse::<Metric>().unwrap(), Metric::Annual);
        assert_eq!("Per-Capita".parse::<Metric>().unwrap(), Metric::PerCapita);
        assert_eq!(
            "Annual CO₂ emissions from land-use change"
                .parse::<Metric>()
                .unwrap(),
            Metric::LandUse
        );
        assert!(matches!(
            "methane".parse::<Metric>(),
            Err(ParseError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_metrics_get_set() {
        let mut metrics = Metrics::default();
        assert_eq!(metrics.get(Metric::Density), None);
        metrics.set(Metric::Density, Some(2.5));
        assert_eq!(metrics.get(Metric::Density), Some(2.5));
        assert_eq!(metrics.get(Metric::Annual), None);
    }
}
