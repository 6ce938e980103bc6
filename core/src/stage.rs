//! Stage trait.
//!
//! RULE: Every generation step implements Stage.
//! The engine calls run() on each registered stage exactly once,
//! in registration order. Execution order is fixed and documented
//! in engine.rs.

use crate::{dataset::Dataset, error::GenResult, rng::StageRng};

/// The contract every stage must fulfill.
pub trait Stage {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Called once per run by the engine.
    ///
    /// - `dataset`: tables written so far; the stage appends its own table
    ///              and only reads tables of earlier stages
    /// - `rng`:     this stage's deterministic RNG stream
    fn run(&mut self, dataset: &mut Dataset, rng: &mut StageRng) -> GenResult<()>;
}
