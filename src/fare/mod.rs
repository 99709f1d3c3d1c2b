//! Fare and travel-time quotes
//!
//! Pure functions from a route distance to one quote per ride class.
//!
//! Formula per class:
//! `price = BASE_FARE * base_multiplier + PER_KM_RATE * rate_multiplier * distance_km`
//! `eta   = ceil(distance_km / speed_kmh * 60)` minutes

use serde::{Deserialize, Serialize};

/// Base fare in currency units
pub const BASE_FARE: f64 = 20.0;

/// Per-kilometer rate in currency units
pub const PER_KM_RATE: f64 = 12.0;

/// Ride classes, in the order they are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideClass {
    /// Economy
    Go,
    /// Premium
    Premier,
    /// Extra large
    Xl,
}

/// Pricing and speed assumptions for a ride class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassParams {
    pub base_multiplier: f64,
    pub rate_multiplier: f64,
    pub speed_kmh: f64,
}

impl RideClass {
    /// Every class, in display order
    pub const ALL: [RideClass; 3] = [RideClass::Go, RideClass::Premier, RideClass::Xl];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Go => "Go",
            Self::Premier => "Premier",
            Self::Xl => "XL",
        }
    }

    pub fn params(&self) -> ClassParams {
        match self {
            Self::Go => ClassParams {
                base_multiplier: 1.0,
                rate_multiplier: 1.0,
                speed_kmh: 40.0,
            },
            Self::Premier => ClassParams {
                base_multiplier: 1.5,
                rate_multiplier: 1.2,
                speed_kmh: 35.0,
            },
            Self::Xl => ClassParams {
                base_multiplier: 2.0,
                rate_multiplier: 1.5,
                speed_kmh: 30.0,
            },
        }
    }

    /// Price for a distance, before formatting
    pub fn fare(&self, distance_km: f64) -> f64 {
        let p = self.params();
        BASE_FARE * p.base_multiplier + PER_KM_RATE * p.rate_multiplier * distance_km
    }

    /// Whole minutes to cover a distance, rounded up
    pub fn eta_minutes(&self, distance_km: f64) -> u64 {
        (distance_km / self.params().speed_kmh * 60.0).ceil().max(0.0) as u64
    }
}

impl std::fmt::Display for RideClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Go => write!(f, "go"),
            Self::Premier => write!(f, "premier"),
            Self::Xl => write!(f, "xl"),
        }
    }
}

impl std::str::FromStr for RideClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "go" | "economy" => Ok(Self::Go),
            "premier" | "premium" => Ok(Self::Premier),
            "xl" => Ok(Self::Xl),
            _ => Err(format!("Unknown ride class: {}", s)),
        }
    }
}

/// A priced, timed offer for one ride class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideQuote {
    pub class: RideClass,
    pub display_name: String,
    /// Price with two decimals, no currency symbol
    pub price: String,
    /// Human readable duration, e.g. "4m" or "1h 5m"
    pub eta: String,
    #[serde(default)]
    pub eta_minutes: u64,
}

/// Quote every ride class for a route distance
pub fn compute_quotes(distance_km: f64) -> Vec<RideQuote> {
    RideClass::ALL
        .iter()
        .map(|class| {
            let minutes = class.eta_minutes(distance_km);
            RideQuote {
                class: *class,
                display_name: class.display_name().to_string(),
                price: format!("{:.2}", class.fare(distance_km)),
                eta: format_eta(minutes),
                eta_minutes: minutes,
            }
        })
        .collect()
}

/// Quotes shown before any route has been estimated
pub fn placeholder_quotes() -> Vec<RideQuote> {
    [
        (RideClass::Go, "24.00", 4),
        (RideClass::Premier, "32.00", 5),
        (RideClass::Xl, "45.00", 4),
    ]
    .into_iter()
    .map(|(class, price, minutes)| RideQuote {
        class,
        display_name: class.display_name().to_string(),
        price: price.to_string(),
        eta: format_eta(minutes),
        eta_minutes: minutes,
    })
    .collect()
}

/// Render minutes as "45m" or "2h 5m"
pub fn format_eta(minutes: u64) -> String {
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn price(q: &RideQuote) -> f64 {
        q.price.parse().unwrap()
    }

    #[test]
    fn test_three_quotes_in_fixed_order() {
        let quotes = compute_quotes(12.5);
        let classes: Vec<RideClass> = quotes.iter().map(|q| q.class).collect();
        assert_eq!(classes, RideClass::ALL.to_vec());
    }

    #[test]
    fn test_zero_distance_is_base_fare() {
        let quotes = compute_quotes(0.0);

        assert_eq!(quotes[0].price, "20.00");
        assert_eq!(quotes[1].price, "30.00");
        assert_eq!(quotes[2].price, "40.00");
        assert!(quotes.iter().all(|q| q.eta == "0m" && q.eta_minutes == 0));
    }

    #[test]
    fn test_delhi_mumbai_fares() {
        let quotes = compute_quotes(1150.0);

        assert_eq!(quotes[0].price, "13820.00");
        assert_eq!(quotes[1].price, "16590.00");
        assert_eq!(quotes[2].price, "20740.00");

        // 1150 km at 40 km/h is 1725 minutes
        assert_eq!(quotes[0].eta, "28h 45m");
    }

    #[test]
    fn test_fare_formula() {
        assert_relative_eq!(RideClass::Premier.fare(10.0), 30.0 + 144.0, epsilon = 1e-9);
        assert_relative_eq!(RideClass::Xl.fare(2.5), 40.0 + 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_eta_rounds_up() {
        // 10 km at 35 km/h = 17.14 minutes
        assert_eq!(RideClass::Premier.eta_minutes(10.0), 18);
        assert_eq!(RideClass::Go.eta_minutes(10.0), 15);
        assert_eq!(RideClass::Xl.eta_minutes(0.01), 1);
    }

    #[test]
    fn test_monotonic_in_distance() {
        let distances = [0.0, 0.4, 1.0, 2.75, 10.0, 39.9, 40.0, 41.0, 120.0, 1150.0];
        for pair in distances.windows(2) {
            let shorter = compute_quotes(pair[0]);
            let longer = compute_quotes(pair[1]);
            for (a, b) in shorter.iter().zip(longer.iter()) {
                assert!(price(a) <= price(b), "{} -> {}", a.price, b.price);
                assert!(a.eta_minutes <= b.eta_minutes);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(compute_quotes(87.31), compute_quotes(87.31));
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(0), "0m");
        assert_eq!(format_eta(59), "59m");
        assert_eq!(format_eta(60), "1h 0m");
        assert_eq!(format_eta(65), "1h 5m");
    }

    #[test]
    fn test_placeholder_quotes() {
        let quotes = placeholder_quotes();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].price, "24.00");
        assert_eq!(quotes[1].eta, "5m");
        assert_eq!(quotes[2].display_name, "XL");
    }

    #[test]
    fn test_ride_class_parsing() {
        assert_eq!("go".parse::<RideClass>().unwrap(), RideClass::Go);
        assert_eq!("Premier".parse::<RideClass>().unwrap(), RideClass::Premier);
        assert_eq!("XL".parse::<RideClass>().unwrap(), RideClass::Xl);
        assert!("bike".parse::<RideClass>().is_err());
    }

    #[test]
    fn test_quote_serialization() {
        let quote = &compute_quotes(5.0)[1];
        let json = serde_json::to_value(quote).unwrap();
        assert_eq!(json["class"], "premier");
        assert_eq!(json["price"], "102.00");
    }
}
