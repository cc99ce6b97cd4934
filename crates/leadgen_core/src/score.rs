/// Three-way colour tier used wherever a lead score is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    /// Palette name of the tier.
    pub fn color(self) -> &'static str {
        match self {
            ScoreTier::High => "success",
            ScoreTier::Medium => "warning",
            ScoreTier::Low => "error",
        }
    }
}

/// Four-band variant used by the results table badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "#4caf50",
            ScoreBand::Good => "#ff9800",
            ScoreBand::Fair => "#ff5722",
            ScoreBand::Poor => "#999",
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

pub fn score_tier(score: f64) -> ScoreTier {
    let score = clamp_score(score);
    if score >= 80.0 {
        ScoreTier::High
    } else if score >= 60.0 {
        ScoreTier::Medium
    } else {
        ScoreTier::Low
    }
}

pub fn score_band(score: f64) -> ScoreBand {
    let score = clamp_score(score);
    if score >= 80.0 {
        ScoreBand::Excellent
    } else if score >= 60.0 {
        ScoreBand::Good
    } else if score >= 40.0 {
        ScoreBand::Fair
    } else {
        ScoreBand::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(score_tier(92.0), ScoreTier::High);
        assert_eq!(score_tier(80.0), ScoreTier::High);
        assert_eq!(score_tier(79.0), ScoreTier::Medium);
        assert_eq!(score_tier(60.0), ScoreTier::Medium);
        assert_eq!(score_tier(59.0), ScoreTier::Low);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(score_tier(250.0), ScoreTier::High);
        assert_eq!(score_tier(-10.0), ScoreTier::Low);
        assert_eq!(score_tier(f64::NAN), ScoreTier::Low);
        assert_eq!(ScoreTier::High.color(), "success");
    }

    #[test]
    fn band_adds_fair_range() {
        assert_eq!(score_band(45.0), ScoreBand::Fair);
        assert_eq!(score_band(39.9), ScoreBand::Poor);
        assert_eq!(score_band(85.0).hex(), "#4caf50");
        assert_eq!(score_band(61.0).label(), "good");
    }
}
