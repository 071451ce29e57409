//! Flood risk assessment and banding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::helpers::f64_to_decimal_2dp;

/// Multiplier applied to the prediction service's raw probability.
pub const PROBABILITY_SCALE: f64 = 0.21;

/// At or above this percentage the band is High.
pub const HIGH_RISK_PERCENT: u8 = 70;

/// At or above this percentage (and below High) the band is Moderate.
pub const MODERATE_RISK_PERCENT: u8 = 40;

/// Minimum percentage at which an alert may be sent.
pub const ALERT_THRESHOLD_PERCENT: u8 = 50;

/// Predicted flood risk as a whole percentage (0–100). Zero until the first
/// prediction resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RiskAssessment {
    pub probability_percent: u8,
}

impl RiskAssessment {
    /// Scale a raw service probability: `round2(raw × 0.21) × 100`, clamped to 0–100.
    pub fn from_flood_probability(raw: f64) -> Self {
        let scaled = f64_to_decimal_2dp(raw * PROBABILITY_SCALE)
            .checked_mul(Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::MAX);
        let percent = scaled
            .round()
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .to_u8()
            .unwrap_or(0);
        Self {
            probability_percent: percent,
        }
    }

    pub fn band(&self) -> RiskBand {
        RiskBand::from_percent(self.probability_percent)
    }
}

/// Display colors for a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandPalette {
    pub text: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn from_percent(percent: u8) -> Self {
        if percent >= HIGH_RISK_PERCENT {
            RiskBand::High
        } else if percent >= MODERATE_RISK_PERCENT {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
        }
    }

    pub fn palette(&self) -> BandPalette {
        match self {
            RiskBand::High => BandPalette {
                text: "red-600",
                background: "red-100",
                border: "red-200",
            },
            RiskBand::Moderate => BandPalette {
                text: "yellow-600",
                background: "yellow-100",
                border: "yellow-200",
            },
            RiskBand::Low => BandPalette {
                text: "green-600",
                background: "green-100",
                border: "green-200",
            },
        }
    }
}

/// Whether the "send alert" action is currently available.
pub fn alert_enabled(risk: RiskAssessment, alert_sent: bool) -> bool {
    risk.probability_percent >= ALERT_THRESHOLD_PERCENT && !alert_sent
}
