use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Frequency, SubscriptionPlanResponse, SubscriptionType};
use crate::utils::pence_to_decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanPrice {
    pub price_pence: i64,
    pub description: &'static str,
}

impl PlanPrice {
    pub fn price(&self) -> Decimal {
        pence_to_decimal(self.price_pence)
    }
}

/// The 2x2x3 plan grid: type x frequency x tier. Built once at startup and
/// read-only afterwards; changing a plan price means a redeploy.
#[derive(Clone)]
pub struct SubscriptionCatalog {
    plans: Arc<HashMap<(SubscriptionType, Frequency, u8), PlanPrice>>,
}

#[rustfmt::skip]
const STANDARD_PLANS: [(SubscriptionType, Frequency, u8, i64, &str); 12] = [
    (SubscriptionType::Laundry, Frequency::Weekly, 1, 1599, "1 bag per week"),
    (SubscriptionType::Laundry, Frequency::Weekly, 2, 2899, "2 bags per week"),
    (SubscriptionType::Laundry, Frequency::Weekly, 3, 3999, "3 bags per week"),
    (SubscriptionType::Laundry, Frequency::Fortnightly, 1, 1499, "1 bag every 2 weeks"),
    (SubscriptionType::Laundry, Frequency::Fortnightly, 2, 2699, "2 bags every 2 weeks"),
    (SubscriptionType::Laundry, Frequency::Fortnightly, 3, 3699, "3 bags every 2 weeks"),
    (SubscriptionType::ShirtsTrousers, Frequency::Weekly, 1, 1299, "5 items per week"),
    (SubscriptionType::ShirtsTrousers, Frequency::Weekly, 2, 2299, "10 items per week"),
    (SubscriptionType::ShirtsTrousers, Frequency::Weekly, 3, 3199, "15 items per week"),
    (SubscriptionType::ShirtsTrousers, Frequency::Fortnightly, 1, 1199, "5 items every 2 weeks"),
    (SubscriptionType::ShirtsTrousers, Frequency::Fortnightly, 2, 2099, "10 items every 2 weeks"),
    (SubscriptionType::ShirtsTrousers, Frequency::Fortnightly, 3, 2999, "15 items every 2 weeks"),
];

impl SubscriptionCatalog {
    pub fn standard() -> Self {
        let plans = STANDARD_PLANS
            .iter()
            .map(|&(subscription_type, frequency, tier, price_pence, description)| {
                (
                    (subscription_type, frequency, tier),
                    PlanPrice {
                        price_pence,
                        description,
                    },
                )
            })
            .collect();

        Self {
            plans: Arc::new(plans),
        }
    }

    /// Exact-key lookup; anything outside the enumerated grid is None.
    pub fn lookup(
        &self,
        subscription_type: SubscriptionType,
        frequency: Frequency,
        tier: u8,
    ) -> Option<PlanPrice> {
        self.plans
            .get(&(subscription_type, frequency, tier))
            .copied()
    }

    /// Full grid, ordered by type, frequency, tier.
    pub fn plans(&self) -> Vec<SubscriptionPlanResponse> {
        let mut entries: Vec<_> = self.plans.iter().collect();
        entries.sort_by_key(|&(&(subscription_type, frequency, tier), _)| {
            (subscription_type, frequency, tier)
        });

        entries
            .into_iter()
            .map(
                |(&(subscription_type, frequency, tier), plan)| SubscriptionPlanResponse {
                    subscription_type,
                    frequency,
                    tier,
                    price: plan.price(),
                    description: plan.description.to_string(),
                },
            )
            .collect()
    }
}
