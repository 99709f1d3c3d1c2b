//! GPX output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{EstimateReport, OutputFormatter, Waypoint};

/// GPX formatter - pickup and drop waypoints plus the route as a track
pub struct GpxFormatter;

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_waypoint(gpx: &mut String, name: &str, point: &Waypoint) {
    gpx.push_str(&format!(
        r#"  <wpt lat="{}" lon="{}">"#,
        point.coords.lat, point.coords.lng
    ));
    gpx.push('\n');
    gpx.push_str(&format!("    <name>{}</name>\n", name));
    gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&point.label)));
    gpx.push_str("  </wpt>\n");
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints and route track"
    }

    fn format(&self, report: &EstimateReport, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="ride-ease">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>ride-ease estimate {}</name>\n", report.id));
        gpx.push_str(&format!("    <time>{}</time>\n", report.generated_at.to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        push_waypoint(&mut gpx, "Pickup", &report.pickup);
        push_waypoint(&mut gpx, "Drop", &report.drop);

        if !report.path.is_empty() {
            gpx.push_str("  <trk>\n");
            gpx.push_str("    <name>Route</name>\n");
            if let Some(km) = report.distance_km {
                gpx.push_str(&format!("    <desc>{:.2} km</desc>\n", km));
            }
            gpx.push_str("    <trkseg>\n");
            for point in &report.path {
                gpx.push_str(&format!(
                    r#"      <trkpt lat="{}" lon="{}"/>"#,
                    point.lat, point.lng
                ));
                gpx.push('\n');
            }
            gpx.push_str("    </trkseg>\n");
            gpx.push_str("  </trk>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
