use serde::{Deserialize, Serialize};

use crate::analyzers::aggregate::DEFAULT_CLASS_IDS;
use crate::error::GradebookError;

/// Dashboard settings.
///
/// Stored as a JSON object on disk; every key is optional:
/// ```json
/// {
///   "class_ids": [1, 2, 3, 4, 5],
///   "display_decimals": 1,
///   "export_prefix": "grades"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sections listed in the class-average report, whether or not they have data.
    pub class_ids: Vec<u32>,
    /// Decimal places used when scores are shown in a table or summary.
    pub display_decimals: usize,
    /// File name prefix of CSV exports.
    pub export_prefix: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            class_ids: DEFAULT_CLASS_IDS.to_vec(),
            display_decimals: 1,
            export_prefix: "grades".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self, GradebookError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
