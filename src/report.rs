use std::fmt::Write;

use crate::models::{CompositeRiskResult, SentimentLabel};

pub fn summarize_pulse(result: &CompositeRiskResult) -> (usize, usize, usize) {
    result
        .social
        .pulse
        .iter()
        .fold((0, 0, 0), |(positive, negative, neutral), entry| match entry.sentiment {
            SentimentLabel::Positive => (positive + 1, negative, neutral),
            SentimentLabel::Negative => (positive, negative + 1, neutral),
            SentimentLabel::Neutral => (positive, negative, neutral + 1),
        })
}

pub fn build_report(result: &CompositeRiskResult) -> String {
    let snapshot = &result.snapshot;
    let mut output = String::new();

    let _ = writeln!(output, "# Environmental Risk Brief");
    let _ = writeln!(
        output,
        "Generated for {} ({:.4}, {:.4}) at {}",
        snapshot.location_name,
        result.coordinates.lat,
        result.coordinates.lon,
        result.assessed_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "**Composite risk {:.1} ({})**",
        result.score, result.severity
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Signal Mix");
    let _ = writeln!(
        output,
        "- Environmental: {:.1} ({})",
        result.environmental.score, result.environmental.severity
    );
    let _ = writeln!(
        output,
        "- Social stress: {:.1} ({}, avg sentiment {:+.2})",
        result.social.score, result.social.severity, result.social.sentiment_average
    );
    let _ = writeln!(
        output,
        "- Classifier: {} ({:.1})",
        result.classifier.label(),
        result.classifier.raw_value()
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Conditions");
    let _ = writeln!(
        output,
        "- Temperature {:.1} °C (feels like {:.1} °C), humidity {:.0}%",
        snapshot.temperature, snapshot.feels_like, snapshot.humidity
    );
    let _ = writeln!(
        output,
        "- Wind {:.1} m/s, rain {:.1} mm/h, UV {:.1}",
        snapshot.wind_speed, snapshot.rain_1h, snapshot.uv_index
    );
    let _ = writeln!(
        output,
        "- AQI {} with PM2.5 {:.1}, PM10 {:.1}, NO2 {:.1}, O3 {:.1}",
        snapshot.aqi,
        snapshot.pollutants.pm2_5,
        snapshot.pollutants.pm10,
        snapshot.pollutants.no2,
        snapshot.pollutants.o3
    );
    if snapshot.weather_is_fallback || snapshot.air_quality_is_fallback {
        let _ = writeln!(
            output,
            "- Note: live data unavailable, synthetic values used (weather: {}, air quality: {})",
            snapshot.weather_is_fallback, snapshot.air_quality_is_fallback
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Contributing Factors");
    for factor in result.contributing_factors.iter() {
        let _ = writeln!(output, "- {}", factor);
    }

    let (positive, negative, neutral) = summarize_pulse(result);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Community Pulse");

    if result.social.pulse.is_empty() {
        let _ = writeln!(output, "No community posts sampled for this location.");
    } else {
        let _ = writeln!(
            output,
            "{} positive, {} negative, {} neutral",
            positive, negative, neutral
        );
        for entry in result.social.pulse.iter() {
            let _ = writeln!(output, "- [{:?}] {}", entry.sentiment, entry.text);
        }
    }

    output
}
