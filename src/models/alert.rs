//! Threshold alert models and API request/response types.
//!
//! Alerts are simple threshold rules evaluated on read: nothing is pushed,
//! no background watcher exists. A client creates a rule, then polls the
//! evaluation endpoint which compares the rule against the current
//! (possibly cached) price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which price surface an alert watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Crypto,
    Stock,
    Forex,
}

/// Which side of the threshold fires the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    /// Fires while the price is at or above the threshold
    Above,

    /// Fires while the price is at or below the threshold
    Below,
}

/// A stored threshold rule.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub market: MarketKind,

    /// Symbol in the market's own notation; forex pairs use "BASE/QUOTE"
    pub symbol: String,

    pub direction: AlertDirection,
    pub threshold: f64,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Whether the rule fires at the given price.
    pub fn is_triggered(&self, price: f64) -> bool {
        match self.direction {
            AlertDirection::Above => price >= self.threshold,
            AlertDirection::Below => price <= self.threshold,
        }
    }
}

/// Request to create a threshold alert.
///
/// # JSON Example
///
/// ```json
/// {
///   "market": "crypto",
///   "symbol": "BTC",
///   "direction": "above",
///   "threshold": 70000.0
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAlertRequest {
    pub market: MarketKind,
    pub symbol: String,
    pub direction: AlertDirection,
    pub threshold: f64,
}

/// Result of evaluating an alert against the current price.
#[derive(Debug, Serialize)]
pub struct AlertEvaluation {
    pub alert: Alert,
    pub current_price: f64,
    pub triggered: bool,
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(direction: AlertDirection, threshold: f64) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            market: MarketKind::Crypto,
            symbol: "BTC".to_string(),
            direction,
            threshold,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn above_fires_at_or_over_threshold() {
        let rule = alert(AlertDirection::Above, 100.0);
        assert!(rule.is_triggered(100.0));
        assert!(rule.is_triggered(150.0));
        assert!(!rule.is_triggered(99.9));
    }

    #[test]
    fn below_fires_at_or_under_threshold() {
        let rule = alert(AlertDirection::Below, 100.0);
        assert!(rule.is_triggered(100.0));
        assert!(rule.is_triggered(42.0));
        assert!(!rule.is_triggered(100.1));
    }
}
