//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{EstimateReport, OutputFormatter};

/// Text formatter - outputs a fare table
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &EstimateReport, config: &Config) -> Result<String> {
        let currency = &config.display.currency;
        let mut output = String::new();

        output.push_str(&format!("ride-ease estimate ({})\n", report.id));
        output.push_str(&format!(
            "Pickup: {} ({:.6}, {:.6})\n",
            report.pickup.label, report.pickup.coords.lat, report.pickup.coords.lng
        ));
        output.push_str(&format!(
            "Drop:   {} ({:.6}, {:.6})\n",
            report.drop.label, report.drop.coords.lat, report.drop.coords.lng
        ));
        match report.distance_km {
            Some(km) => output.push_str(&format!("Distance: {:.2} km\n\n", km)),
            None => output.push_str("Distance: unavailable (showing base fares)\n\n"),
        }

        output.push_str("Rides:\n");
        for quote in &report.quotes {
            output.push_str(&format!(
                "  {:<8} {}{:>10}  {}\n",
                quote.display_name, currency, quote.price, quote.eta
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_report;

    #[test]
    fn test_text_format() {
        let output = TextFormatter
            .format(&sample_report(), &Config::default())
            .unwrap();

        assert!(output.contains("ride-ease estimate"));
        assert!(output.contains("Pickup: Delhi"));
        assert!(output.contains("Drop:   Mumbai"));
        assert!(output.contains("Distance: 1150.00 km"));
        assert!(output.contains("13820.00"));
        assert!(output.contains("XL"));
        assert!(output.contains("28h 45m"));
        assert!(output.contains('₹'));
    }

    #[test]
    fn test_text_without_distance() {
        let mut report = sample_report();
        report.distance_km = None;

        let output = TextFormatter.format(&report, &Config::default()).unwrap();
        assert!(output.contains("Distance: unavailable"));
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
