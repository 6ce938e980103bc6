use crate::{
    error::{GenError, GenResult},
    horizon::Horizon,
    types::{AccessType, AddonType, Gender, Money, PlanId, Segment},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub plan_id: PlanId,
    pub plan_name: String,
    pub monthly_price: Money,
    pub access_type: AccessType,
    /// Probability that a subscriber cancels in any given month.
    pub monthly_churn_hazard: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedCostConfig {
    pub cost_type: String,
    pub monthly_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub segment: Segment,
    pub population_share: f64,
    /// Inclusive lower age bound.
    pub age_min: u32,
    /// Exclusive upper age bound.
    pub age_max: u32,
    /// Plan preference, aligned with `SimConfig::plans` order.
    pub plan_weights: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderShare {
    pub gender: Gender,
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonConfig {
    pub addon_type: AddonType,
    pub monthly_price: Money,
    /// Per-segment adoption probability.
    pub adoption: BTreeMap<Segment, f64>,
}

impl AddonConfig {
    /// Same adoption probability for every segment.
    pub fn uniform(addon_type: AddonType, monthly_price: Money, p: f64) -> Self {
        Self {
            addon_type,
            monthly_price,
            adoption: Segment::ALL.iter().map(|s| (*s, p)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnConfig {
    /// Hard cap on simulated lifetime, in months.
    pub max_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinWindow {
    pub hours: Vec<u32>,
    pub weights: Vec<f64>,
}

impl CheckinWindow {
    /// Uniform weights over `hours`.
    pub fn uniform(hours: impl IntoIterator<Item = u32>) -> Self {
        let hours: Vec<u32> = hours.into_iter().collect();
        let weights = vec![1.0; hours.len()];
        Self { hours, weights }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitConfig {
    pub daily_probability: f64,
    pub duration_mean: f64,
    pub duration_std: f64,
    pub duration_min: u32,
    pub duration_max: u32,
    pub checkin_windows: BTreeMap<AccessType, CheckinWindow>,
}

/// The full parameter set. Read-only once the engine is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub horizon: Horizon,
    pub population: usize,
    /// Reference figure for the facility; recorded with the run, constrains nothing.
    pub facility_capacity: u32,
    pub plans: Vec<PlanConfig>,
    pub fixed_costs: Vec<FixedCostConfig>,
    pub segments: Vec<SegmentConfig>,
    pub genders: Vec<GenderShare>,
    /// Catalog order is draw order.
    pub addons: Vec<AddonConfig>,
    pub churn: ChurnConfig,
    pub visits: VisitConfig,
}

impl SimConfig {
    /// Load a full parameter file (JSON).
    /// In tests, use SimConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    pub fn plan(&self, plan_id: PlanId) -> Option<&PlanConfig> {
        self.plans.iter().find(|p| p.plan_id == plan_id)
    }

    pub fn segment(&self, segment: Segment) -> Option<&SegmentConfig> {
        self.segments.iter().find(|s| s.segment == segment)
    }

    /// Fail fast on parameters that would yield skewed or degenerate output.
    pub fn validate(&self) -> GenResult<()> {
        if self.horizon.start > self.horizon.end {
            return Err(GenError::config(format!(
                "horizon start {} is after end {}",
                self.horizon.start, self.horizon.end
            )));
        }

        // ── Plans ──────────────────────────────────────────────
        if self.plans.is_empty() {
            return Err(GenError::config("plan catalog is empty"));
        }
        let mut plan_ids = BTreeSet::new();
        for plan in &self.plans {
            if !plan_ids.insert(plan.plan_id) {
                return Err(GenError::config(format!("duplicate plan_id {}", plan.plan_id)));
            }
            check_probability(
                &format!("churn hazard of plan {}", plan.plan_id),
                plan.monthly_churn_hazard,
            )?;
            if !self.visits.checkin_windows.contains_key(&plan.access_type) {
                return Err(GenError::config(format!(
                    "no check-in window for access type '{}' (plan {})",
                    plan.access_type.as_str(),
                    plan.plan_id
                )));
            }
        }

        // ── Fixed costs ────────────────────────────────────────
        let mut cost_types = BTreeSet::new();
        for cost in &self.fixed_costs {
            if !cost_types.insert(cost.cost_type.as_str()) {
                return Err(GenError::config(format!(
                    "fixed cost '{}' listed twice",
                    cost.cost_type
                )));
            }
        }

        // ── Segments ───────────────────────────────────────────
        if self.segments.is_empty() {
            return Err(GenError::config("segment list is empty"));
        }
        let mut seen = BTreeSet::new();
        for seg in &self.segments {
            let name = seg.segment.as_str();
            if !seen.insert(seg.segment) {
                return Err(GenError::config(format!("segment '{name}' listed twice")));
            }
            check_weight(&format!("population share of '{name}'"), seg.population_share)?;
            if seg.age_min >= seg.age_max {
                return Err(GenError::config(format!(
                    "age range [{}, {}) of '{name}' is empty",
                    seg.age_min, seg.age_max
                )));
            }
            check_weights(&format!("plan weights of '{name}'"), &seg.plan_weights)?;
            if seg.plan_weights.len() != self.plans.len() {
                return Err(GenError::config(format!(
                    "plan weights of '{name}' have {} entries, catalog has {} plans",
                    seg.plan_weights.len(),
                    self.plans.len()
                )));
            }
        }

        // ── Genders ────────────────────────────────────────────
        let gender_weights: Vec<f64> = self.genders.iter().map(|g| g.share).collect();
        check_weights("gender shares", &gender_weights)?;

        // ── Add-ons ────────────────────────────────────────────
        let mut addon_types = BTreeSet::new();
        for addon in &self.addons {
            let name = addon.addon_type.as_str();
            if !addon_types.insert(addon.addon_type) {
                return Err(GenError::config(format!("add-on '{name}' listed twice")));
            }
            for seg in &self.segments {
                let p = addon.adoption.get(&seg.segment).ok_or_else(|| {
                    GenError::config(format!(
                        "add-on '{name}' has no adoption rate for segment '{}'",
                        seg.segment.as_str()
                    ))
                })?;
                check_probability(&format!("adoption of '{name}'"), *p)?;
            }
        }

        // ── Churn ──────────────────────────────────────────────
        if self.churn.max_months == 0 {
            return Err(GenError::config("churn max_months must be at least 1"));
        }

        // ── Visits ─────────────────────────────────────────────
        let v = &self.visits;
        check_probability("daily visit probability", v.daily_probability)?;
        if !v.duration_mean.is_finite() || !v.duration_std.is_finite() || v.duration_std <= 0.0 {
            return Err(GenError::config(format!(
                "visit duration distribution N({}, {}) is invalid",
                v.duration_mean, v.duration_std
            )));
        }
        if v.duration_min > v.duration_max {
            return Err(GenError::config(format!(
                "visit duration bounds [{}, {}] are inverted",
                v.duration_min, v.duration_max
            )));
        }
        for (access, window) in &v.checkin_windows {
            let name = access.as_str();
            if window.hours.is_empty() {
                return Err(GenError::config(format!("check-in window '{name}' has no hours")));
            }
            if let Some(h) = window.hours.iter().find(|h| **h > 23) {
                return Err(GenError::config(format!(
                    "check-in window '{name}' contains hour {h}"
                )));
            }
            if window.hours.len() != window.weights.len() {
                return Err(GenError::config(format!(
                    "check-in window '{name}' has {} hours but {} weights",
                    window.hours.len(),
                    window.weights.len()
                )));
            }
            check_weights(&format!("check-in weights of '{name}'"), &window.weights)?;
        }

        Ok(())
    }
}

fn check_probability(what: &str, p: f64) -> GenResult<()> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(GenError::config(format!("{what} = {p} is not a probability")))
    }
}

fn check_weight(what: &str, w: f64) -> GenResult<()> {
    if w.is_finite() && w > 0.0 {
        Ok(())
    } else {
        Err(GenError::config(format!("{what} = {w} must be strictly positive")))
    }
}

fn check_weights(what: &str, weights: &[f64]) -> GenResult<()> {
    if weights.is_empty() {
        return Err(GenError::config(format!("{what} are empty")));
    }
    for w in weights {
        check_weight(what, *w)?;
    }
    Ok(())
}

impl Default for SimConfig {
    /// The reference parameter set.
    fn default() -> Self {
        let plans = vec![
            PlanConfig {
                plan_id: 1,
                plan_name: "Basic".into(),
                monthly_price: 2000,
                access_type: AccessType::Full,
                monthly_churn_hazard: 0.045,
            },
            PlanConfig {
                plan_id: 2,
                plan_name: "Premium".into(),
                monthly_price: 4500,
                access_type: AccessType::Full,
                monthly_churn_hazard: 0.030,
            },
            PlanConfig {
                plan_id: 3,
                plan_name: "Off-Peak".into(),
                monthly_price: 1000,
                access_type: AccessType::OffPeak,
                monthly_churn_hazard: 0.060,
            },
            PlanConfig {
                plan_id: 4,
                plan_name: "Student".into(),
                monthly_price: 1200,
                access_type: AccessType::Full,
                monthly_churn_hazard: 0.070,
            },
        ];

        let fixed_costs = [
            ("rent", 300_000),
            ("staff", 450_000),
            ("utilities", 80_000),
            ("marketing", 70_000),
        ]
        .into_iter()
        .map(|(cost_type, monthly_cost)| FixedCostConfig {
            cost_type: cost_type.into(),
            monthly_cost,
        })
        .collect();

        let segments = vec![
            SegmentConfig {
                segment: Segment::Student,
                population_share: 0.22,
                age_min: 18,
                age_max: 26,
                plan_weights: vec![0.25, 0.15, 0.10, 0.50],
            },
            SegmentConfig {
                segment: Segment::Adult,
                population_share: 0.68,
                age_min: 26,
                age_max: 56,
                plan_weights: vec![0.55, 0.30, 0.12, 0.03],
            },
            SegmentConfig {
                segment: Segment::Senior,
                population_share: 0.10,
                age_min: 56,
                age_max: 71,
                plan_weights: vec![0.55, 0.15, 0.25, 0.05],
            },
        ];

        let addons = vec![
            AddonConfig {
                addon_type: AddonType::Drinks,
                monthly_price: 400,
                adoption: [
                    (Segment::Student, 0.35),
                    (Segment::Adult, 0.28),
                    (Segment::Senior, 0.28),
                ]
                .into(),
            },
            AddonConfig {
                addon_type: AddonType::Sauna,
                monthly_price: 1000,
                adoption: [
                    (Segment::Student, 0.18),
                    (Segment::Adult, 0.25),
                    (Segment::Senior, 0.18),
                ]
                .into(),
            },
            AddonConfig::uniform(AddonType::PersonalTraining, 8000, 0.08),
        ];

        let checkin_windows = [
            (AccessType::OffPeak, CheckinWindow::uniform(7..=16)),
            (AccessType::Full, CheckinWindow::uniform(6..=21)),
        ]
        .into();

        Self {
            horizon: Horizon::new(
                NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid literal date"),
                NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid literal date"),
            ),
            population: 2500,
            facility_capacity: 180,
            plans,
            fixed_costs,
            segments,
            genders: vec![
                GenderShare { gender: Gender::M, share: 0.52 },
                GenderShare { gender: Gender::F, share: 0.48 },
            ],
            addons,
            churn: ChurnConfig { max_months: 24 },
            visits: VisitConfig {
                daily_probability: 0.35,
                duration_mean: 70.0,
                duration_std: 25.0,
                duration_min: 30,
                duration_max: 150,
                checkin_windows,
            },
        }
    }
}
