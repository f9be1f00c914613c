//! Insight generation

use crate::{compliance_score, recommendations, ComplianceVerdict};
use readings::{Reading, SummaryStats};
use serde::{Deserialize, Serialize};
use thresholds::ThresholdConfig;
use tracing::debug;

/// Number of recent readings compared for trend insights
pub const TREND_WINDOW: usize = 10;

/// Temperature change across the trend window that warrants an insight (°C)
const TEMP_TREND_DELTA: f64 = 2.0;

/// Humidity change across the trend window that warrants an insight (%)
const HUMIDITY_TREND_DELTA: f64 = 5.0;

/// A generated diagnostic statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub icon: String,
    pub title: String,
    pub text: String,
}

impl Insight {
    fn new(icon: &str, title: &str, text: String) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            text,
        }
    }
}

/// Produce the ordered insight list for a report.
///
/// `recent` is the reading history in arrival order; only its last
/// [`TREND_WINDOW`] entries are used for trend detection.
pub fn generate_insights(
    stats: &SummaryStats,
    recent: &[Reading],
    config: &ThresholdConfig,
) -> Vec<Insight> {
    let mut insights = vec![
        temperature_insight(stats, config),
        humidity_insight(stats, config),
        air_quality_insight(stats, config),
    ];

    insights.extend(trend_insights(recent));

    let score = compliance_score(stats, config);
    insights.push(Insight::new(
        "[COMPLIANCE]",
        "Compliance Status",
        format!(
            "Environmental compliance score: {}%. {}",
            score,
            ComplianceVerdict::from_score(score).description()
        ),
    ));

    let remarks = recommendations(stats, config);
    insights.push(Insight::new("[AI]", "AI Recommendations", remarks.join(" ")));

    debug!("Generated {} insights (compliance {}%)", insights.len(), score);
    insights
}

fn temperature_insight(stats: &SummaryStats, config: &ThresholdConfig) -> Insight {
    let avg = stats.avg_temp;
    if avg > config.temp_max {
        Insight::new(
            "[TEMP]",
            "High Temperature Detected",
            format!(
                "Average temperature ({avg:.1}C) exceeds the maximum threshold ({}C). This may \
                 indicate inadequate cooling, increased heat sources, or HVAC system issues. \
                 Recommend immediate inspection and potential adjustment of cooling systems.",
                config.temp_max
            ),
        )
    } else if avg < config.temp_min {
        Insight::new(
            "[COLD]",
            "Low Temperature Alert",
            format!(
                "Average temperature ({avg:.1}C) is below minimum threshold ({}C). This could \
                 affect equipment performance and occupant comfort. Consider adjusting heating \
                 systems or checking for drafts.",
                config.temp_min
            ),
        )
    } else {
        Insight::new(
            "[OK]",
            "Temperature Optimal",
            format!(
                "Temperature levels are within acceptable range ({avg:.1}C). Current conditions \
                 are suitable for normal operations and occupant comfort."
            ),
        )
    }
}

fn humidity_insight(stats: &SummaryStats, config: &ThresholdConfig) -> Insight {
    let avg = stats.avg_humidity;
    if avg > config.humidity_max {
        Insight::new(
            "[H2O]",
            "High Humidity Warning",
            format!(
                "Average humidity ({avg:.1}%) exceeds maximum threshold ({}%). Elevated humidity \
                 can promote mold growth, damage equipment, and reduce air quality. Recommend \
                 improving ventilation or deploying dehumidification systems.",
                config.humidity_max
            ),
        )
    } else if avg < config.humidity_min {
        Insight::new(
            "[DRY]",
            "Low Humidity Notice",
            format!(
                "Average humidity ({avg:.1}%) is below minimum threshold ({}%). Low humidity can \
                 cause discomfort, static electricity, and respiratory issues. Consider using \
                 humidifiers or adjusting HVAC settings.",
                config.humidity_min
            ),
        )
    } else {
        Insight::new(
            "[OK]",
            "Humidity Balanced",
            format!(
                "Humidity levels are well-maintained at {avg:.1}%. Current conditions prevent \
                 mold growth while maintaining comfort."
            ),
        )
    }
}

fn air_quality_insight(stats: &SummaryStats, config: &ThresholdConfig) -> Insight {
    let avg = stats.avg_air;
    if avg > config.air_max {
        Insight::new(
            "[AIR]",
            "Poor Air Quality Alert",
            format!(
                "Average air quality ({avg:.0} ppm) exceeds safe threshold ({} ppm). This \
                 indicates elevated pollutant levels that may affect health and productivity. \
                 Immediate actions: improve ventilation, identify pollution sources, and consider \
                 air filtration systems.",
                config.air_max
            ),
        )
    } else if avg > config.air_max * 0.7 {
        Insight::new(
            "[!]",
            "Air Quality Monitoring",
            format!(
                "Air quality ({avg:.0} ppm) is approaching threshold levels. While currently \
                 acceptable, continued monitoring is recommended. Consider preventive measures \
                 to maintain optimal air quality."
            ),
        )
    } else {
        Insight::new(
            "[OK]",
            "Excellent Air Quality",
            format!(
                "Air quality is excellent at {avg:.0} ppm, well below the threshold of {} ppm. \
                 Current ventilation and environmental controls are effective.",
                config.air_max
            ),
        )
    }
}

fn trend_insights(recent: &[Reading]) -> Vec<Insight> {
    if recent.len() < TREND_WINDOW {
        return Vec::new();
    }
    let window = &recent[recent.len() - TREND_WINDOW..];
    let (first, last) = (&window[0], &window[TREND_WINDOW - 1]);
    let temp_trend = last.temperature - first.temperature;
    let humidity_trend = last.humidity - first.humidity;

    let mut insights = Vec::new();
    if temp_trend.abs() > TEMP_TREND_DELTA {
        let (verb, remark) = if temp_trend > 0.0 {
            ("increased", "Rising temperatures may require cooling system adjustment.")
        } else {
            (
                "decreased",
                "Falling temperatures may indicate cooling system overcorrection or external factors.",
            )
        };
        insights.push(Insight::new(
            "[TREND]",
            "Temperature Trend Alert",
            format!(
                "Temperature has {verb} by {:.1}C in recent readings. {remark}",
                temp_trend.abs()
            ),
        ));
    }

    if humidity_trend.abs() > HUMIDITY_TREND_DELTA {
        let verb = if humidity_trend > 0.0 { "increased" } else { "decreased" };
        insights.push(Insight::new(
            "[TREND]",
            "Humidity Trend Notice",
            format!(
                "Humidity has {verb} by {:.1}% recently. Monitor for continued changes and \
                 adjust environmental controls as needed.",
                humidity_trend.abs()
            ),
        ));
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn stats(avg_temp: f64, avg_humidity: f64, avg_air: f64) -> SummaryStats {
        SummaryStats {
            count: 20,
            avg_temp,
            avg_humidity,
            avg_air,
        }
    }

    fn titles(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    fn ramp(temp_step: f64, humidity_step: f64, n: usize) -> Vec<Reading> {
        let now = Utc::now();
        (0..n)
            .map(|i| {
                Reading::new(
                    now,
                    20.0 + temp_step * i as f64,
                    50.0 + humidity_step * i as f64,
                    300.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_nominal_report() {
        let insights = generate_insights(&stats(25.0, 55.0, 200.0), &[], &ThresholdConfig::default());
        assert_eq!(
            titles(&insights),
            vec![
                "Temperature Optimal",
                "Humidity Balanced",
                "Excellent Air Quality",
                "Compliance Status",
                "AI Recommendations",
            ]
        );
        assert!(insights[3].text.starts_with("Environmental compliance score: 100%."));
    }

    #[test]
    fn test_out_of_bounds_report() {
        let insights =
            generate_insights(&stats(10.0, 90.0, 450.0), &[], &ThresholdConfig::default());
        assert_eq!(insights[0].title, "Low Temperature Alert");
        assert_eq!(insights[0].icon, "[COLD]");
        assert_eq!(insights[1].title, "High Humidity Warning");
        assert_eq!(insights[2].title, "Air Quality Monitoring");
        assert!(insights[0].text.contains("(10.0C)"));
        assert!(insights[0].text.contains("(15C)"));
    }

    #[test]
    fn test_trend_needs_ten_readings() {
        let config = ThresholdConfig::default();
        let short = ramp(1.0, 1.0, 9);
        let insights = generate_insights(&stats(25.0, 55.0, 200.0), &short, &config);
        assert!(!titles(&insights).contains(&"Temperature Trend Alert"));
    }

    #[test]
    fn test_trend_uses_last_ten() {
        let config = ThresholdConfig::default();
        // Over 10 readings: temp +4.5, humidity -9.0
        let mut readings = ramp(5.0, 0.0, 5);
        readings.extend(ramp(0.5, -1.0, 10));
        let insights = generate_insights(&stats(25.0, 55.0, 200.0), &readings, &config);
        let trend: Vec<&Insight> = insights.iter().filter(|i| i.icon == "[TREND]").collect();
        assert_eq!(trend.len(), 2);
        assert_eq!(
            trend[0].text,
            "Temperature has increased by 4.5C in recent readings. Rising temperatures may \
             require cooling system adjustment."
        );
        assert!(trend[1].text.starts_with("Humidity has decreased by 9.0% recently."));
    }

    #[test]
    fn test_small_trend_ignored() {
        let readings = ramp(0.2, 0.5, 10);
        let insights =
            generate_insights(&stats(25.0, 55.0, 200.0), &readings, &ThresholdConfig::default());
        assert!(insights.iter().all(|i| i.icon != "[TREND]"));
    }

    proptest! {
        #[test]
        fn prop_single_high_temperature_insight(excess in 0.01f64..200.0) {
            let config = ThresholdConfig::default();
            let insights = generate_insights(
                &stats(config.temp_max + excess, 55.0, 200.0),
                &[],
                &config,
            );
            let high = insights.iter().filter(|i| i.title == "High Temperature Detected").count();
            prop_assert_eq!(high, 1);
        }
    }
}
