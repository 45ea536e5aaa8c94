//! Static plan catalog.
//!
//! Plans define what a paid API key costs and how many calls it grants.
//! The catalog is compiled into the binary: prices and quotas are immutable
//! constants known at startup, there is no plan administration surface.

use serde::Serialize;

/// A purchasable access tier.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "pro",
///   "name": "Pro",
///   "price_usd": 15.0,
///   "call_quota": 10000
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plan {
    /// Stable identifier used as the plan selector in order requests
    pub id: &'static str,

    /// Human-readable display name
    pub name: &'static str,

    /// Price in the reference currency (US dollars)
    pub price_usd: f64,

    /// Number of authenticated calls granted to a key minted for this plan
    pub call_quota: i64,
}

/// All purchasable plans, ordered from lowest to highest tier.
pub static CATALOG: [Plan; 3] = [
    Plan {
        id: "starter",
        name: "Starter",
        price_usd: 5.0,
        call_quota: 1_000,
    },
    Plan {
        id: "pro",
        name: "Pro",
        price_usd: 15.0,
        call_quota: 10_000,
    },
    Plan {
        id: "business",
        name: "Business",
        price_usd: 50.0,
        call_quota: 100_000,
    },
];

/// Resolve a plan selector from an order request.
///
/// An absent or unrecognized selector falls back to the lowest tier.
/// This is deliberate leniency rather than an error: a typo in the plan
/// field buys the cheapest plan instead of failing the purchase.
pub fn resolve(selector: Option<&str>) -> &'static Plan {
    selector
        .and_then(|id| CATALOG.iter().find(|plan| plan.id == id))
        .unwrap_or(&CATALOG[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_plan() {
        let plan = resolve(Some("pro"));
        assert_eq!(plan.id, "pro");
        assert_eq!(plan.price_usd, 15.0);
        assert_eq!(plan.call_quota, 10_000);
    }

    #[test]
    fn unknown_selector_falls_back_to_lowest_tier() {
        assert_eq!(resolve(Some("platinum")).id, "starter");
    }

    #[test]
    fn absent_selector_falls_back_to_lowest_tier() {
        assert_eq!(resolve(None).id, "starter");
    }

    #[test]
    fn catalog_is_ordered_by_price() {
        for pair in CATALOG.windows(2) {
            assert!(pair[0].price_usd < pair[1].price_usd);
            assert!(pair[0].call_quota < pair[1].call_quota);
        }
    }
}
