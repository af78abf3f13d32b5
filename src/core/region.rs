//! Deployment regions and caller-side request validation

use crate::error::ScaffoldError;
use serde::Serialize;

/// A Fly.io deployment region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

/// Region offered when the caller does not choose one
pub const DEFAULT_REGION: &str = "arn";

static REGIONS: [Region; 15] = [
    Region { code: "arn", name: "Stockholm, Sweden", flag: "🇸🇪" },
    Region { code: "syd", name: "Sydney, Australia", flag: "🇦🇺" },
    Region { code: "hkg", name: "Hong Kong", flag: "🇭🇰" },
    Region { code: "nrt", name: "Tokyo, Japan", flag: "🇯🇵" },
    Region { code: "lax", name: "Los Angeles, California (US)", flag: "🇺🇸" },
    Region { code: "iad", name: "Ashburn, Virginia (US)", flag: "🇺🇸" },
    Region { code: "dfw", name: "Dallas, Texas (US)", flag: "🇺🇸" },
    Region { code: "sea", name: "Seattle, Washington (US)", flag: "🇺🇸" },
    Region { code: "ewr", name: "Secaucus, NJ (US)", flag: "🇺🇸" },
    Region { code: "maa", name: "Chennai (Madras), India", flag: "🇮🇳" },
    Region { code: "ams", name: "Amsterdam, Netherlands", flag: "🇳🇱" },
    Region { code: "cdg", name: "Paris, France", flag: "🇫🇷" },
    Region { code: "lhr", name: "London, United Kingdom", flag: "🇬🇧" },
    Region { code: "fra", name: "Frankfurt, Germany", flag: "🇩🇪" },
    Region { code: "gru", name: "São Paulo, Brazil", flag: "🇧🇷" },
];

/// All known regions, in display order
pub fn all() -> &'static [Region] {
    &REGIONS
}

/// Find a region by its code
pub fn lookup(code: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.code == code)
}

/// Validate a scaffold request before a pipeline is built
///
/// Both fields are required, the project name may not contain spaces and
/// the region must be one of [`all`].
pub fn validate_request(project_name: &str, region: &str) -> Result<&'static Region, ScaffoldError> {
    if project_name.is_empty() || region.is_empty() {
        return Err(ScaffoldError::InvalidArgument(
            "Project name and region are required".to_string(),
        ));
    }

    if project_name.chars().any(char::is_whitespace) {
        return Err(ScaffoldError::InvalidArgument(
            "Project name should not contain spaces".to_string(),
        ));
    }

    lookup(region).ok_or_else(|| ScaffoldError::UnknownRegion(region.to_string()))
}
