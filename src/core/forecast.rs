// Prognosis forecasting: which finishes first, the immunity race or the disease?
//
// Both processes are projected forward linearly from their current per-day rates.

/// Floor for per-day rates when projecting, avoids dividing by zero.
const RATE_EPSILON: f32 = 1e-6;

/// Qualitative forecast shown on the affliction tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Neither severity nor immunity is moving
    Stable,
    /// Severity is projected to reach its maximum first
    AtRisk,
    /// Severity is falling
    Improving,
    /// Immunity is projected to complete first
    LikelyImmune,
    /// No forecast available
    None,
}

impl Verdict {
    /// Display label, `None` when there is nothing to show.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Stable => Some("Stable"),
            Self::AtRisk => Some("At risk"),
            Self::Improving => Some("Improving"),
            Self::LikelyImmune => Some("Likely immune"),
            Self::None => None,
        }
    }
}

/// Snapshot of the two competing processes for one affliction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastInput {
    pub immunity: f32,
    pub immunity_per_day: f32,
    pub severity: f32,
    pub severity_per_day: f32,
}

impl ForecastInput {
    pub fn new(immunity: f32, immunity_per_day: f32, severity: f32, severity_per_day: f32) -> Self {
        Self {
            immunity,
            immunity_per_day,
            severity,
            severity_per_day,
        }
    }

    /// Projected days until immunity reaches 1.
    pub fn days_to_immune(&self) -> f32 {
        days_or_never((1.0 - self.immunity) / self.immunity_per_day.max(RATE_EPSILON))
    }

    /// Projected days until severity reaches 1.
    pub fn days_to_fatal(&self) -> f32 {
        days_or_never((1.0 - self.severity) / self.severity_per_day.max(RATE_EPSILON))
    }
}

/// Tooltip classification. A tie between the two projections reads as `LikelyImmune`.
pub fn classify(input: &ForecastInput) -> Verdict {
    let immunity_rising = input.immunity_per_day > 0.0;
    let severity_rising = input.severity_per_day > 0.0;

    if !immunity_rising && !severity_rising {
        return Verdict::Stable;
    }
    if !immunity_rising {
        return Verdict::AtRisk;
    }
    if !severity_rising {
        return Verdict::Improving;
    }

    if input.days_to_immune() < input.days_to_fatal() {
        Verdict::LikelyImmune
    } else {
        Verdict::AtRisk
    }
}

/// Alert-path check. Unlike [`classify`], a tie counts as at risk.
pub fn is_at_risk(input: &ForecastInput) -> bool {
    let immunity_rising = input.immunity_per_day > 0.0;
    let severity_rising = input.severity_per_day > 0.0;

    if !severity_rising {
        return false;
    }
    if !immunity_rising {
        return true;
    }

    input.days_to_immune() >= input.days_to_fatal()
}

/// NaN, infinite and negative projections all mean "never".
fn days_or_never(days: f32) -> f32 {
    if !days.is_finite() || days < 0.0 {
        f32::INFINITY
    } else {
        days
    }
}
