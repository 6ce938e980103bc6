//! Every foreign key in a generated dataset resolves.

use fitdata_core::{config::SimConfig, engine::GenEngine};
use std::collections::BTreeSet;

#[test]
fn all_foreign_keys_resolve() {
    let config = SimConfig { population: 400, ..SimConfig::default() };
    let dataset = GenEngine::build(0xFEED_BEEF, config).unwrap().run().unwrap();

    let customers: BTreeSet<u64> = dataset.customers.iter().map(|c| c.customer_id).collect();
    let plans: BTreeSet<u32> = dataset.plans.iter().map(|p| p.plan_id).collect();

    for s in &dataset.subscriptions {
        assert!(customers.contains(&s.customer_id), "subscription {} → missing customer", s.subscription_id);
        assert!(plans.contains(&s.plan_id), "subscription {} → missing plan {}", s.subscription_id, s.plan_id);
    }
    for a in &dataset.addons {
        assert!(customers.contains(&a.customer_id), "addon → missing customer {}", a.customer_id);
    }
    for v in &dataset.visits {
        assert!(customers.contains(&v.customer_id), "visit {} → missing customer", v.visit_id);
    }
}

#[test]
fn every_customer_owns_exactly_one_subscription() {
    let config = SimConfig { population: 400, ..SimConfig::default() };
    let dataset = GenEngine::build(17, config).unwrap().run().unwrap();

    let owners: Vec<u64> = dataset.subscriptions.iter().map(|s| s.customer_id).collect();
    let unique: BTreeSet<u64> = owners.iter().copied().collect();
    assert_eq!(owners.len(), dataset.customers.len());
    assert_eq!(unique.len(), owners.len());

    let ids: Vec<u64> = dataset.subscriptions.iter().map(|s| s.subscription_id).collect();
    assert_eq!(ids, (1..=400).collect::<Vec<u64>>());
}
