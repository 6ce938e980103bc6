//! Synthetic dataset generator for a subscription-based fitness business.
//!
//! A small parameter set (segment mix, plan preference, churn hazard,
//! visit frequency, check-in windows) drives four stages that produce
//! six cross-referencing tables: customers, plans, subscriptions,
//! add-ons, visits and fixed costs.
//!
//! ```rust,ignore
//! use fitdata_core::{config::SimConfig, engine::GenEngine, export};
//!
//! let mut engine = GenEngine::build(42, SimConfig::default())?;
//! let dataset = engine.run()?;
//! export::write_dataset(&dataset, std::path::Path::new("data/raw"))?;
//! ```

pub mod addon_sampler;
pub mod config;
pub mod customer_generator;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod export;
pub mod horizon;
pub mod rng;
pub mod stage;
pub mod store;
pub mod subscription_simulator;
pub mod types;
pub mod visit_simulator;
