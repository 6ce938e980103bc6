//! The generated dataset: six flat tables cross-referenced by foreign key.
//!
//! RULE: Each table is written by exactly one stage.
//! Stages may read tables written by earlier stages, never later ones.

use crate::{
    addon_sampler::AddonRecord,
    config::SimConfig,
    customer_generator::CustomerRecord,
    subscription_simulator::SubscriptionRecord,
    types::{AccessType, Money, PlanId, SubscriptionStatus},
    visit_simulator::VisitRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRecord {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub monthly_price: Money,
    pub access_type: AccessType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedCostRecord {
    pub cost_type: String,
    pub monthly_cost: Money,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub plans: Vec<PlanRecord>,
    pub fixed_costs: Vec<FixedCostRecord>,
    pub customers: Vec<CustomerRecord>,
    pub subscriptions: Vec<SubscriptionRecord>,
    pub addons: Vec<AddonRecord>,
    pub visits: Vec<VisitRecord>,
}

impl Dataset {
    /// A dataset holding only the static catalogs.
    pub fn with_catalogs(config: &SimConfig) -> Self {
        let plans = config
            .plans
            .iter()
            .map(|p| PlanRecord {
                plan_id: p.plan_id,
                plan_name: p.plan_name.clone(),
                monthly_price: p.monthly_price,
                access_type: p.access_type,
            })
            .collect();
        let fixed_costs = config
            .fixed_costs
            .iter()
            .map(|c| FixedCostRecord {
                cost_type: c.cost_type.clone(),
                monthly_cost: c.monthly_cost,
            })
            .collect();
        Self {
            plans,
            fixed_costs,
            ..Self::default()
        }
    }

    pub fn plan(&self, plan_id: PlanId) -> Option<&PlanRecord> {
        self.plans.iter().find(|p| p.plan_id == plan_id)
    }

    pub fn subscription_count(&self, status: SubscriptionStatus) -> usize {
        self.subscriptions.iter().filter(|s| s.status == status).count()
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            customers: self.customers.len(),
            subscriptions: self.subscriptions.len(),
            active_subscriptions: self.subscription_count(SubscriptionStatus::Active),
            canceled_subscriptions: self.subscription_count(SubscriptionStatus::Canceled),
            visits: self.visits.len(),
            addons: self.addons.len(),
        }
    }
}

/// Row counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub customers: usize,
    pub subscriptions: usize,
    pub active_subscriptions: usize,
    pub canceled_subscriptions: usize,
    pub visits: usize,
    pub addons: usize,
}
