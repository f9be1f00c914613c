//! Compliance score and recommendations

use readings::SummaryStats;
use thresholds::ThresholdConfig;

/// Overall reading of a compliance score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceVerdict {
    Excellent,
    Good,
    ActionRequired,
}

impl ComplianceVerdict {
    /// Classify a 0-100 score
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            ComplianceVerdict::Excellent
        } else if score >= 70 {
            ComplianceVerdict::Good
        } else {
            ComplianceVerdict::ActionRequired
        }
    }

    /// Sentence used in the compliance insight
    pub fn description(&self) -> &'static str {
        match self {
            ComplianceVerdict::Excellent => "Excellent compliance with all environmental standards.",
            ComplianceVerdict::Good => "Good compliance, minor adjustments recommended.",
            ComplianceVerdict::ActionRequired => {
                "Compliance issues detected, immediate action required."
            }
        }
    }
}

/// Score from 0 to 100 describing how far averages sit from their bounds
pub fn compliance_score(stats: &SummaryStats, config: &ThresholdConfig) -> u8 {
    let mut score: i32 = 100;

    if stats.avg_temp > config.temp_max || stats.avg_temp < config.temp_min {
        score -= 30;
    } else if (stats.avg_temp - config.temp_midpoint()).abs() > 5.0 {
        score -= 10;
    }

    if stats.avg_humidity > config.humidity_max || stats.avg_humidity < config.humidity_min {
        score -= 30;
    } else if (stats.avg_humidity - config.humidity_midpoint()).abs() > 10.0 {
        score -= 10;
    }

    if stats.avg_air > config.air_max {
        score -= 40;
    } else if stats.avg_air > config.air_max * 0.8 {
        score -= 15;
    }

    score.clamp(0, 100) as u8
}

/// One remark per metric nearing its upper bound, or a single all-clear
pub fn recommendations(stats: &SummaryStats, config: &ThresholdConfig) -> Vec<&'static str> {
    let mut remarks = Vec::new();

    if stats.avg_temp > config.temp_max - 2.0 {
        remarks.push("Consider increasing cooling capacity or improving insulation.");
    }
    if stats.avg_humidity > config.humidity_max - 5.0 {
        remarks.push("Enhance ventilation or install dehumidification systems.");
    }
    if stats.avg_air > config.air_max * 0.6 {
        remarks.push("Implement air filtration and identify pollution sources.");
    }

    if remarks.is_empty() {
        remarks.push(
            "Current environmental controls are effective. Continue regular monitoring and maintenance.",
        );
    }
    remarks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stats(avg_temp: f64, avg_humidity: f64, avg_air: f64) -> SummaryStats {
        SummaryStats {
            count: 10,
            avg_temp,
            avg_humidity,
            avg_air,
        }
    }

    #[test]
    fn test_perfect_score() {
        // Midpoints of the default bands, air well under 80%
        let score = compliance_score(&stats(25.0, 55.0, 200.0), &ThresholdConfig::default());
        assert_eq!(score, 100);
    }

    #[test]
    fn test_partial_deductions() {
        let config = ThresholdConfig::default();
        // temp 31 is 6 from midpoint, humidity 70 is 15 from midpoint, air 500 > 480
        assert_eq!(compliance_score(&stats(31.0, 70.0, 500.0), &config), 65);
    }

    #[test]
    fn test_everything_out_of_bounds() {
        let config = ThresholdConfig::default();
        assert_eq!(compliance_score(&stats(50.0, 95.0, 6000.0), &config), 0);
    }

    #[test]
    fn test_verdicts() {
        assert_eq!(ComplianceVerdict::from_score(95), ComplianceVerdict::Excellent);
        assert_eq!(ComplianceVerdict::from_score(70), ComplianceVerdict::Good);
        assert_eq!(ComplianceVerdict::from_score(69), ComplianceVerdict::ActionRequired);
    }

    #[test]
    fn test_recommendations() {
        let config = ThresholdConfig::default();
        let remarks = recommendations(&stats(34.0, 76.0, 400.0), &config);
        assert_eq!(remarks.len(), 3);

        let remarks = recommendations(&stats(22.0, 50.0, 100.0), &config);
        assert_eq!(remarks.len(), 1);
        assert!(remarks[0].starts_with("Current environmental controls are effective"));
    }

    proptest! {
        #[test]
        fn prop_score_always_clamped(
            temp in -1000.0f64..1000.0,
            humidity in -1000.0f64..1000.0,
            air_factor in 0.0f64..100.0,
        ) {
            let config = ThresholdConfig::default();
            let score = compliance_score(&stats(temp, humidity, config.air_max * air_factor), &config);
            prop_assert!(score <= 100);
        }

        #[test]
        fn prop_hot_average_costs_thirty(temp_excess in 0.01f64..500.0) {
            let config = ThresholdConfig::default();
            let score = compliance_score(&stats(config.temp_max + temp_excess, 55.0, 100.0), &config);
            prop_assert!(score <= 70);
        }
    }
}
