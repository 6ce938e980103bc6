//! Visit simulator: the day-granularity loop over every subscription.
//!
//! For each day in `[start_date, effective_end]` one Bernoulli draw decides
//! whether the member visits (at most one visit per day). A visit draws its
//! check-in hour from the plan's access-tier window, a uniform minute, and a
//! normally distributed duration clipped to the configured bounds.
//!
//! Draw order: subscriptions in id order; per day the visit draw, then
//! (only when a visit occurs) hour, minute, duration.

use crate::{
    config::{SimConfig, VisitConfig},
    dataset::Dataset,
    error::{GenError, GenResult},
    horizon::{days_inclusive, Horizon},
    rng::{categorical, StageRng},
    stage::Stage,
    subscription_simulator::SubscriptionRecord,
    types::{serialize_timestamp, AccessType, EntityId},
};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rand::distributions::WeightedIndex;
use rand_distr::Normal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisitRecord {
    pub visit_id: EntityId,
    pub customer_id: EntityId,
    #[serde(serialize_with = "serialize_timestamp")]
    pub checkin_ts: NaiveDateTime,
    #[serde(serialize_with = "serialize_timestamp")]
    pub checkout_ts: NaiveDateTime,
    pub duration_min: u32,
}

struct HourWindow {
    hours: Vec<u32>,
    index: WeightedIndex<f64>,
}

pub struct VisitSimulator {
    horizon: Horizon,
    daily_probability: f64,
    duration: Normal<f64>,
    duration_min: u32,
    duration_max: u32,
    windows: BTreeMap<AccessType, HourWindow>,
}

impl VisitSimulator {
    pub fn new(config: &SimConfig) -> GenResult<Self> {
        config.validate()?;

        let VisitConfig {
            daily_probability,
            duration_mean,
            duration_std,
            duration_min,
            duration_max,
            checkin_windows,
        } = &config.visits;

        let duration = Normal::new(*duration_mean, *duration_std).map_err(|e| {
            GenError::config(format!(
                "visit duration N({duration_mean}, {duration_std}) is invalid: {e}"
            ))
        })?;

        let mut windows = BTreeMap::new();
        for (access, window) in checkin_windows {
            let what = format!("check-in weights of '{}'", access.as_str());
            let index = categorical(&what, window.weights.iter().copied())?;
            windows.insert(*access, HourWindow { hours: window.hours.clone(), index });
        }

        Ok(Self {
            horizon: config.horizon,
            daily_probability: *daily_probability,
            duration,
            duration_min: *duration_min,
            duration_max: *duration_max,
            windows,
        })
    }

    /// Duration in whole minutes: normal draw, clipped, then rounded.
    fn draw_duration(&self, rng: &mut StageRng) -> u32 {
        let raw: f64 = rng.sample(&self.duration);
        raw.clamp(self.duration_min as f64, self.duration_max as f64).round() as u32
    }

    fn draw_checkin_time(&self, access: AccessType, rng: &mut StageRng) -> GenResult<NaiveTime> {
        let window = self.windows.get(&access).ok_or_else(|| {
            GenError::config(format!("no check-in window for access type '{}'", access.as_str()))
        })?;
        let hour = window.hours[rng.sample(&window.index)];
        let minute = rng.range_u32(0, 60);
        NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| GenError::config(format!("check-in hour {hour} is not a clock hour")))
    }

    /// Visits of one subscription. `next_id` is advanced per visit so ids
    /// stay sequential across the whole table.
    pub fn visits_for(
        &self,
        subscription: &SubscriptionRecord,
        access: AccessType,
        next_id: &mut EntityId,
        rng: &mut StageRng,
    ) -> GenResult<Vec<VisitRecord>> {
        let mut visits = Vec::new();
        let last_day = subscription.effective_end(&self.horizon);

        for day in days_inclusive(subscription.start_date, last_day) {
            if !rng.chance(self.daily_probability) {
                continue;
            }
            let checkin_ts = day.and_time(self.draw_checkin_time(access, rng)?);
            let duration_min = self.draw_duration(rng);
            let checkout_ts = checkin_ts + Duration::minutes(i64::from(duration_min));

            visits.push(VisitRecord {
                visit_id: *next_id,
                customer_id: subscription.customer_id,
                checkin_ts,
                checkout_ts,
                duration_min,
            });
            *next_id += 1;
        }
        Ok(visits)
    }
}

impl Stage for VisitSimulator {
    fn name(&self) -> &'static str {
        "visit"
    }

    fn run(&mut self, dataset: &mut Dataset, rng: &mut StageRng) -> GenResult<()> {
        let mut visits = Vec::new();
        let mut next_id: EntityId = 1;

        for subscription in &dataset.subscriptions {
            let access = dataset
                .plan(subscription.plan_id)
                .map(|p| p.access_type)
                .ok_or_else(|| {
                    GenError::config(format!(
                        "subscription {} references unknown plan {}",
                        subscription.subscription_id, subscription.plan_id
                    ))
                })?;
            visits.extend(self.visits_for(subscription, access, &mut next_id, rng)?);
        }

        dataset.visits = visits;
        log::info!("visit: simulated {} visits", dataset.visits.len());
        Ok(())
    }
}
