//! Subscription simulator: plan choice plus a discrete-time churn process.
//!
//! Each customer gets exactly one subscription starting on the signup date.
//! Lifetime is drawn month by month: a draw above the plan's monthly hazard
//! means the customer survives another month. The process stops on the first
//! draw at/under the hazard or at the `max_months` cap.
//!
//! A lifetime that ends past the observation horizon is right-censored:
//! the subscription is recorded as active with no end date.
//!
//! Draw order per customer: plan choice, then one draw per simulated month.

use crate::{
    config::{PlanConfig, SimConfig},
    customer_generator::CustomerRecord,
    dataset::Dataset,
    error::{GenError, GenResult},
    horizon::{add_months, Horizon},
    rng::{categorical, StageRng},
    stage::Stage,
    types::{EntityId, PlanId, Segment, SubscriptionStatus},
};
use chrono::NaiveDate;
use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRecord {
    pub subscription_id: EntityId,
    pub customer_id: EntityId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    /// None while the subscription is open at the horizon.
    pub end_date: Option<NaiveDate>,
    pub status: SubscriptionStatus,
}

impl SubscriptionRecord {
    /// Last day of membership: the end date, or the horizon end if still open.
    pub fn effective_end(&self, horizon: &Horizon) -> NaiveDate {
        self.end_date.unwrap_or(horizon.end)
    }
}

pub struct SubscriptionSimulator {
    horizon: Horizon,
    max_months: u32,
    plans: Vec<PlanConfig>,
    plan_choice: BTreeMap<Segment, WeightedIndex<f64>>,
}

impl SubscriptionSimulator {
    pub fn new(config: &SimConfig) -> GenResult<Self> {
        config.validate()?;

        let mut plan_choice = BTreeMap::new();
        for seg in &config.segments {
            let what = format!("plan weights of '{}'", seg.segment.as_str());
            plan_choice.insert(seg.segment, categorical(&what, seg.plan_weights.iter().copied())?);
        }

        Ok(Self {
            horizon: config.horizon,
            max_months: config.churn.max_months,
            plans: config.plans.clone(),
            plan_choice,
        })
    }

    /// Categorical plan draw using the segment's preference vector.
    pub fn choose_plan(&self, segment: Segment, rng: &mut StageRng) -> GenResult<&PlanConfig> {
        let dist = self.plan_choice.get(&segment).ok_or_else(|| {
            GenError::config(format!("no plan weights for segment '{}'", segment.as_str()))
        })?;
        let idx = rng.sample(dist);
        self.plans
            .get(idx)
            .ok_or_else(|| GenError::config(format!("plan index {idx} outside catalog")))
    }

    /// Simulate the subscription of `customer` on a given plan.
    pub fn simulate_for_plan(
        &self,
        subscription_id: EntityId,
        customer: &CustomerRecord,
        plan: &PlanConfig,
        rng: &mut StageRng,
    ) -> GenResult<SubscriptionRecord> {
        let start_date = customer.signup_date;
        let months = months_alive(plan.monthly_churn_hazard, self.max_months, rng);
        let churn_date = add_months(start_date, months)?;

        let (end_date, status) = if self.horizon.is_beyond(churn_date) {
            (None, SubscriptionStatus::Active)
        } else {
            log::debug!(
                "subscription: {subscription_id} on plan {} canceled after {months} months",
                plan.plan_id
            );
            (Some(churn_date), SubscriptionStatus::Canceled)
        };

        Ok(SubscriptionRecord {
            subscription_id,
            customer_id: customer.customer_id,
            plan_id: plan.plan_id,
            start_date,
            end_date,
            status,
        })
    }

    /// Choose a plan for `customer`, then simulate its lifetime.
    pub fn simulate(
        &self,
        subscription_id: EntityId,
        customer: &CustomerRecord,
        rng: &mut StageRng,
    ) -> GenResult<SubscriptionRecord> {
        let plan = self.choose_plan(customer.segment, rng)?;
        self.simulate_for_plan(subscription_id, customer, plan, rng)
    }
}

/// Months survived under a constant monthly hazard, in `[1, max_months]`.
///
/// Every subscription lives at least one month; each further month
/// consumes one draw, including the draw that hits the cap.
pub fn months_alive(hazard: f64, max_months: u32, rng: &mut StageRng) -> u32 {
    let mut months = 1;
    loop {
        let survived = rng.next_f64() > hazard;
        if !survived || months >= max_months {
            return months;
        }
        months += 1;
    }
}

impl Stage for SubscriptionSimulator {
    fn name(&self) -> &'static str {
        "subscription"
    }

    fn run(&mut self, dataset: &mut Dataset, rng: &mut StageRng) -> GenResult<()> {
        let mut subscriptions = Vec::with_capacity(dataset.customers.len());
        for (i, customer) in dataset.customers.iter().enumerate() {
            subscriptions.push(self.simulate(i as EntityId + 1, customer, rng)?);
        }
        dataset.subscriptions = subscriptions;

        log::info!(
            "subscription: simulated {} subscriptions ({} active, {} canceled)",
            dataset.subscriptions.len(),
            dataset.subscription_count(SubscriptionStatus::Active),
            dataset.subscription_count(SubscriptionStatus::Canceled),
        );
        Ok(())
    }
}
