use serde::{Deserialize, Serialize};

/// Configuration for the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Maximum nesting depth the traversal descends into before failing with
    /// [`DiffError::DepthLimitExceeded`](crate::DiffError::DepthLimitExceeded).
    pub max_depth: usize,
    /// Which indices are visited in arrays that contain nested values.
    pub array_coverage: ArrayCoverage,
    /// What happens in falsy mode when the values match none of the falsy
    /// rules.
    pub falsy_gap: FalsyGap,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            array_coverage: ArrayCoverage::Trigger,
            falsy_gap: FalsyGap::Silent,
        }
    }
}

impl DiffConfig {
    /// Visit every index of every branch and fall through to the ordinary
    /// rules when falsy mode has nothing to say.
    ///
    /// Produces records for differences that the default configuration
    /// leaves unreported.
    pub fn exhaustive() -> Self {
        Self {
            array_coverage: ArrayCoverage::Union,
            falsy_gap: FalsyGap::FallThrough,
            ..Default::default()
        }
    }
}

/// Index range for arrays holding nested objects or arrays.
///
/// Such arrays are compared position by position. The range decides what
/// happens when the three branches have different lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayCoverage {
    /// Indices of the array whose key iteration triggered the visit.
    /// Positions only the other branches have are not visited.
    #[default]
    Trigger,
    /// Indices up to the longest array among the three branches, so
    /// positions past the end of one branch surface as `N`, `D` or `C`.
    /// A slot that some branch lacks or holds a scalar in is compared as a
    /// whole.
    Union,
}

/// Outcome for falsy-mode combinations outside the three falsy rules
/// (for example parent truthy, theirs falsy, mine falsy).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalsyGap {
    /// Report nothing.
    #[default]
    Silent,
    /// Continue with the presence and equality rules as if falsy mode were
    /// off.
    FallThrough,
}
