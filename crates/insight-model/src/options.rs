//! Configuration options for analysis requests.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Allowed significance levels.
pub const ALPHA_RANGE: (f64, f64) = (0.01, 0.10);
/// Allowed confidence levels for intervals.
pub const CONFIDENCE_RANGE: (f64, f64) = (0.80, 0.99);

/// Options shared by the statistical commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Significance level used to decide whether H0 is rejected.
    pub alpha: f64,
    /// Confidence level for mean intervals.
    pub confidence: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            confidence: 0.95,
        }
    }
}

impl AnalysisOptions {
    pub fn new(alpha: f64, confidence: f64) -> Result<Self> {
        Self::default().with_alpha(alpha)?.with_confidence(confidence)
    }

    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        check_range("alpha", alpha, ALPHA_RANGE)?;
        self.alpha = alpha;
        Ok(self)
    }

    pub fn with_confidence(mut self, confidence: f64) -> Result<Self> {
        check_range("confidence", confidence, CONFIDENCE_RANGE)?;
        self.confidence = confidence;
        Ok(self)
    }
}

fn check_range(name: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ModelError::OptionOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
