use serde::{Deserialize, Serialize};

/// What happens when pasted or imported data extends past the sheet bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowPolicy {
    /// Extend `numRows`/`numCols` to fit
    #[default]
    Grow,
    /// Drop whatever falls outside the current bounds
    Clamp,
}
