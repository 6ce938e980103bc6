use crate::{
    config::{SegmentConfig, SimConfig},
    dataset::Dataset,
    error::{GenError, GenResult},
    horizon::Horizon,
    rng::{categorical, StageRng},
    stage::Stage,
    types::{EntityId, Gender, Segment},
};
use chrono::NaiveDate;
use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: EntityId,
    pub signup_date: NaiveDate,
    pub age: u32,
    pub gender: Gender,
    pub segment: Segment,
}

/// Draws the customer population.
///
/// Draw order per customer: signup day, segment, gender, age.
pub struct CustomerGenerator {
    horizon: Horizon,
    population: usize,
    segments: Vec<SegmentConfig>,
    segment_index: WeightedIndex<f64>,
    genders: Vec<Gender>,
    gender_index: WeightedIndex<f64>,
}

impl CustomerGenerator {
    pub fn new(config: &SimConfig) -> GenResult<Self> {
        config.validate()?;

        if config.horizon.len_days() == 0 {
            return Err(GenError::config("horizon contains no days"));
        }
        let segment_index = categorical(
            "segment shares",
            config.segments.iter().map(|s| s.population_share),
        )?;
        let gender_index =
            categorical("gender shares", config.genders.iter().map(|g| g.share))?;

        Ok(Self {
            horizon: config.horizon,
            population: config.population,
            segments: config.segments.clone(),
            segment_index,
            genders: config.genders.iter().map(|g| g.gender).collect(),
            gender_index,
        })
    }

    /// Draw one customer. Pure sampling, no state beyond the RNG.
    pub fn generate_one(&self, customer_id: EntityId, rng: &mut StageRng) -> CustomerRecord {
        let offset = rng.next_u64_below(self.horizon.len_days());
        let signup_date = self.horizon.day(offset);

        let seg = &self.segments[rng.sample(&self.segment_index)];
        let gender = self.genders[rng.sample(&self.gender_index)];
        let age = rng.range_u32(seg.age_min, seg.age_max);

        CustomerRecord {
            customer_id,
            signup_date,
            age,
            gender,
            segment: seg.segment,
        }
    }

    /// Customers with sequential ids 1..=N.
    pub fn generate_population(&self, rng: &mut StageRng) -> Vec<CustomerRecord> {
        (1..=self.population as EntityId)
            .map(|id| self.generate_one(id, rng))
            .collect()
    }
}

impl Stage for CustomerGenerator {
    fn name(&self) -> &'static str {
        "customer"
    }

    fn run(&mut self, dataset: &mut Dataset, rng: &mut StageRng) -> GenResult<()> {
        dataset.customers = self.generate_population(rng);
        log::info!("customer: generated {} customers", dataset.customers.len());
        Ok(())
    }
}
