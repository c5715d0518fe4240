//! Per-token pricing.

use serde::{Deserialize, Serialize};

/// Flat per-token price used to turn a token total into a cost estimate.
///
/// The price is externally configured; the default matches a blended
/// flash-tier rate. No currency rounding is applied here — callers round for
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    /// Price per single token, in dollars.
    pub per_token: f64,
}

impl Default for TokenPrice {
    fn default() -> Self {
        Self {
            per_token: 0.000002,
        }
    }
}

impl TokenPrice {
    /// Create a price from a per-token dollar rate. Negative rates are
    /// clamped to zero so cost estimates stay non-negative.
    pub fn new(per_token: f64) -> Self {
        Self {
            per_token: per_token.max(0.0),
        }
    }

    /// Estimated cost for the given token total.
    pub fn cost(&self, total_tokens: u64) -> f64 {
        total_tokens as f64 * self.per_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_price() {
        let price = TokenPrice::default();
        assert!((price.per_token - 0.000002).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cost_calculation() {
        let price = TokenPrice::new(0.000002);
        let cost = price.cost(1_000_000);
        assert!((cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_tokens_zero_cost() {
        assert_eq!(TokenPrice::default().cost(0), 0.0);
    }

    #[test]
    fn test_negative_rate_clamped() {
        let price = TokenPrice::new(-1.0);
        assert_eq!(price.cost(100), 0.0);
    }
}
