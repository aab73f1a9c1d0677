use serde::{Deserialize, Serialize};

/// Placeholder the dataset uses for rows without a continent.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Returns true if `region` names a real region.
///
/// Missing, blank and `Unknown` (any case) regions are not known.
pub fn is_known_region(region: Option<&str>) -> bool {
    match region.map(str::trim) {
        None | Some("") => false,
        Some(r) => !r.eq_ignore_ascii_case(UNKNOWN_REGION),
    }
}

/// Which records a region-aware aggregation keeps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionScope {
    /// Every record, including those without a region.
    #[default]
    All,
    /// Only records with a known region.
    Known,
    /// Only records in the named region.
    Only(String),
}

impl RegionScope {
    /// Scope for an optional region name, as passed by a region selector.
    /// `all` selects every record.
    pub fn from_selection(region: Option<String>) -> RegionScope {
        match region {
            Some(r) if r.trim().eq_ignore_ascii_case("all") => RegionScope::All,
            Some(r) if is_known_region(Some(&r)) => RegionScope::Only(r),
            _ => RegionScope::All,
        }
    }

    pub fn admits(&self, region: Option<&str>) -> bool {
        match self {
            RegionScope::All => true,
            RegionScope::Known => is_known_region(region),
            RegionScope::Only(wanted) => {
                is_known_region(region) && region.map(str::trim) == Some(wanted.trim())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_known_region() {
        assert!(is_known_region(Some("Asia")));
        assert!(!is_known_region(None));
        assert!(!is_known_region(Some("")));
        assert!(!is_known_region(Some("  ")));
        assert!(!is_known_region(Some("Unknown")));
        assert!(!is_known_region(Some("UNKNOWN")));
    }

    #[test]
    fn test_scope_admits() {
        assert!(RegionScope::All.admits(None));
        assert!(!RegionScope::Known.admits(Some("Unknown")));
        assert!(RegionScope::Known.admits(Some("Europe")));
        let asia = RegionScope::Only("Asia".to_string());
        assert!(asia.admits(Some("Asia")));
        assert!(!asia.admits(Some("Europe")));
        assert!(!asia.admits(None));
    }

    #[test]
    fn test_from_selection() {
        assert_eq!(
            RegionScope::from_selection(Some("Asia".to_string())),
            RegionScope::Only("Asia".to_string())
        );
        assert_eq!(RegionScope::from_selection(None), RegionScope::All);
        assert_eq!(
            RegionScope::from_selection(Some("All".to_string())),
            RegionScope::All
        );
    }
}
