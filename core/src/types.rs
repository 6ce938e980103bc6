//! Shared primitive types used across the entire generator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

/// Surrogate key for customers, subscriptions and visits.
/// Assigned sequentially from 1 within a run.
pub type EntityId = u64;

/// Plan catalog key.
pub type PlanId = u32;

/// Integer currency units (cents).
pub type Money = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Student,
    Adult,
    Senior,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Student, Segment::Adult, Segment::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Adult   => "adult",
            Self::Senior  => "senior",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
        }
    }
}

/// Access tier: restricts the hours at which visits may be recorded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    Full,
    OffPeak,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full    => "full",
            Self::OffPeak => "off_peak",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active   => "active",
            Self::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AddonType {
    Drinks,
    Sauna,
    PersonalTraining,
}

impl AddonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drinks           => "drinks",
            Self::Sauna            => "sauna",
            Self::PersonalTraining => "personal_training",
        }
    }
}

/// Timestamp wire format for every table: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize_timestamp<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format(TIMESTAMP_FORMAT))
}
