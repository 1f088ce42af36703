//! Subscription plan catalog entity.
//!
//! Plans are read-only from the booking engine's perspective; catalog CRUD
//! lives outside this core.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, TenantId};

/// Billing interval of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanInterval {
    Monthly,
    Yearly,
}

impl PlanInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanInterval::Monthly => "monthly",
            PlanInterval::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(PlanInterval::Monthly),
            "yearly" => Some(PlanInterval::Yearly),
            _ => None,
        }
    }
}

/// A purchasable plan granting a number of appointment credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub tenant_id: TenantId,
    pub name: String,
    pub interval: PlanInterval,
    pub credits: i32,
    pub price_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_round_trips_through_strings() {
        assert_eq!(PlanInterval::parse("monthly"), Some(PlanInterval::Monthly));
        assert_eq!(PlanInterval::parse("yearly"), Some(PlanInterval::Yearly));
        assert_eq!(PlanInterval::parse("weekly"), None);
    }
}
