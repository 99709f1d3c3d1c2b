//! Payment collaborator
//!
//! The core hands an amount to a [`PaymentGateway`] and only cares whether
//! the rider paid or backed out. No money moves anywhere.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// What the payment step reported back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Succeeded,
    Cancelled,
}

impl std::str::FromStr for PaymentOutcome {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "succeeded" | "success" => Ok(Self::Succeeded),
            "cancelled" | "canceled" | "cancel" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown payment outcome: {}", s)),
        }
    }
}

/// Trait for payment backends
pub trait PaymentGateway: Send + Sync {
    /// Charge an amount given as a two-decimal string
    fn charge(&self, amount: &str) -> impl std::future::Future<Output = Result<PaymentOutcome>> + Send;
}

/// Pretends to process a card for a fixed time, then succeeds
#[derive(Debug, Clone)]
pub struct SimulatedPayment {
    delay: Duration,
}

impl SimulatedPayment {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl PaymentGateway for SimulatedPayment {
    async fn charge(&self, amount: &str) -> Result<PaymentOutcome> {
        info!(amount, "processing payment");
        tokio::time::sleep(self.delay).await;
        Ok(PaymentOutcome::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_payment_succeeds() {
        let gateway = SimulatedPayment::from_millis(0);
        assert_eq!(gateway.charge("24.00").await.unwrap(), PaymentOutcome::Succeeded);
    }

    #[test]
    fn test_outcome_parsing() {
        assert_eq!("success".parse::<PaymentOutcome>().unwrap(), PaymentOutcome::Succeeded);
        assert_eq!("Cancelled".parse::<PaymentOutcome>().unwrap(), PaymentOutcome::Cancelled);
        assert!("refund".parse::<PaymentOutcome>().is_err());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&PaymentOutcome::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
