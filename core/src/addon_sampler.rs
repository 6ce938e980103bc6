use crate::{
    config::{AddonConfig, SimConfig},
    customer_generator::CustomerRecord,
    dataset::Dataset,
    error::{GenError, GenResult},
    rng::StageRng,
    stage::Stage,
    types::{AddonType, EntityId, Money},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddonRecord {
    pub customer_id: EntityId,
    pub addon_type: AddonType,
    pub monthly_price: Money,
}

/// One independent Bernoulli draw per add-on type, in catalog order.
/// A customer may hold any subset of the catalog.
pub struct AddonSampler {
    catalog: Vec<AddonConfig>,
}

impl AddonSampler {
    pub fn new(config: &SimConfig) -> Self {
        Self { catalog: config.addons.clone() }
    }

    pub fn sample_for(
        &self,
        customer: &CustomerRecord,
        rng: &mut StageRng,
    ) -> GenResult<Vec<AddonRecord>> {
        let mut held = Vec::new();
        for addon in &self.catalog {
            let p = addon.adoption.get(&customer.segment).ok_or_else(|| {
                GenError::config(format!(
                    "add-on '{}' has no adoption rate for segment '{}'",
                    addon.addon_type.as_str(),
                    customer.segment.as_str()
                ))
            })?;
            if rng.chance(*p) {
                held.push(AddonRecord {
                    customer_id: customer.customer_id,
                    addon_type: addon.addon_type,
                    monthly_price: addon.monthly_price,
                });
            }
        }
        Ok(held)
    }
}

impl Stage for AddonSampler {
    fn name(&self) -> &'static str {
        "addon"
    }

    fn run(&mut self, dataset: &mut Dataset, rng: &mut StageRng) -> GenResult<()> {
        let mut addons = Vec::new();
        for customer in &dataset.customers {
            addons.extend(self.sample_for(customer, rng)?);
        }
        dataset.addons = addons;
        log::info!("addon: sampled {} add-ons", dataset.addons.len());
        Ok(())
    }
}
