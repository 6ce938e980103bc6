//! The generation engine: wires the stages and owns the randomness.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Customer generator      -> customers
//!   2. Subscription simulator  -> subscriptions (reads customers)
//!   3. Add-on sampler          -> addons (reads customers)
//!   4. Visit simulator         -> visits (reads subscriptions, plans)
//!
//! RULES:
//!   - Stages execute in registration order, once per run.
//!   - A stage reads ONLY tables written by earlier stages.
//!   - All randomness flows through the RngBank; each stage
//!     draws from its own slot stream.
//!   - Same seed + same config = identical dataset.

use crate::{
    addon_sampler::AddonSampler,
    config::SimConfig,
    customer_generator::CustomerGenerator,
    dataset::Dataset,
    error::GenResult,
    rng::{RngBank, StageSlot},
    stage::Stage,
    subscription_simulator::SubscriptionSimulator,
    visit_simulator::VisitSimulator,
};

pub struct GenEngine {
    pub rng_bank: RngBank,
    config:       SimConfig,
    stages:       Vec<(StageSlot, Box<dyn Stage>)>,
}

impl GenEngine {
    /// An engine with no stages registered.
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self {
            rng_bank: RngBank::new(seed),
            config,
            stages: Vec::new(),
        }
    }

    /// Build a fully wired engine with all stages registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(seed: u64, config: SimConfig) -> GenResult<Self> {
        config.validate()?;

        let customers = CustomerGenerator::new(&config)?;
        let subscriptions = SubscriptionSimulator::new(&config)?;
        let addons = AddonSampler::new(&config);
        let visits = VisitSimulator::new(&config)?;

        let mut engine = GenEngine::new(seed, config);
        // EXECUTION ORDER is fixed. Never reorder.
        engine.register(StageSlot::Customer, Box::new(customers));
        engine.register(StageSlot::Subscription, Box::new(subscriptions));
        engine.register(StageSlot::Addon, Box::new(addons));
        engine.register(StageSlot::Visit, Box::new(visits));
        Ok(engine)
    }

    /// Register a stage. Call in the documented execution order.
    pub fn register(&mut self, slot: StageSlot, stage: Box<dyn Stage>) {
        self.stages.push((slot, stage));
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Run every stage once and return the complete dataset.
    /// Any stage error aborts the run; there is no partial dataset.
    pub fn run(&mut self) -> GenResult<Dataset> {
        let mut dataset = Dataset::with_catalogs(&self.config);
        log::info!(
            "engine: seed={} population={} horizon={}..={}",
            self.seed(),
            self.config.population,
            self.config.horizon.start,
            self.config.horizon.end,
        );

        for (slot, stage) in &mut self.stages {
            let mut rng = self.rng_bank.for_stage(*slot);
            log::debug!("engine: running stage '{}' on rng '{}'", stage.name(), rng.name);
            stage.run(&mut dataset, &mut rng)?;
        }

        Ok(dataset)
    }
}
