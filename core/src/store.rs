//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Stages never touch it; the runner hands a finished dataset over.
//! Foreign keys are enforced, so a dataset that breaks referential
//! integrity fails to insert.

use crate::{
    dataset::Dataset,
    error::GenResult,
    types::{SubscriptionStatus, TIMESTAMP_FORMAT},
};
use rusqlite::{params, Connection};

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open (or create) the dataset database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        population: usize,
        facility_capacity: u32,
    ) -> GenResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, population, facility_capacity)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, seed as i64, version, population as i64, facility_capacity],
        )?;
        Ok(())
    }

    // ── Dataset ────────────────────────────────────────────────

    /// Insert every table of `dataset` under `run_id` in one transaction.
    /// Either the whole dataset lands or nothing does.
    pub fn insert_dataset(&self, run_id: &str, dataset: &Dataset) -> GenResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO plan (run_id, plan_id, plan_name, monthly_price, access_type)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for p in &dataset.plans {
                stmt.execute(params![
                    run_id,
                    p.plan_id,
                    &p.plan_name,
                    p.monthly_price as i64,
                    p.access_type.as_str(),
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO fixed_cost (run_id, cost_type, monthly_cost) VALUES (?1, ?2, ?3)",
            )?;
            for c in &dataset.fixed_costs {
                stmt.execute(params![run_id, &c.cost_type, c.monthly_cost as i64])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO customer (run_id, customer_id, signup_date, age, gender, segment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for c in &dataset.customers {
                stmt.execute(params![
                    run_id,
                    c.customer_id as i64,
                    c.signup_date.to_string(),
                    c.age,
                    c.gender.as_str(),
                    c.segment.as_str(),
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO subscription (
                    run_id, subscription_id, customer_id, plan_id, start_date, end_date, status
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for s in &dataset.subscriptions {
                stmt.execute(params![
                    run_id,
                    s.subscription_id as i64,
                    s.customer_id as i64,
                    s.plan_id,
                    s.start_date.to_string(),
                    s.end_date.map(|d| d.to_string()),
                    s.status.as_str(),
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO addon (run_id, customer_id, addon_type, monthly_price)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for a in &dataset.addons {
                stmt.execute(params![
                    run_id,
                    a.customer_id as i64,
                    a.addon_type.as_str(),
                    a.monthly_price as i64,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO visit (
                    run_id, visit_id, customer_id, checkin_ts, checkout_ts, duration_min
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for v in &dataset.visits {
                stmt.execute(params![
                    run_id,
                    v.visit_id as i64,
                    v.customer_id as i64,
                    v.checkin_ts.format(TIMESTAMP_FORMAT).to_string(),
                    v.checkout_ts.format(TIMESTAMP_FORMAT).to_string(),
                    v.duration_min,
                ])?;
            }
        }

        tx.commit()?;
        log::info!("store: persisted run {run_id}");
        Ok(())
    }

    // ── Counts ─────────────────────────────────────────────────

    pub fn customer_count(&self, run_id: &str) -> GenResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM customer WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?)
    }

    pub fn subscription_count(&self, run_id: &str, status: SubscriptionStatus) -> GenResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM subscription WHERE run_id = ?1 AND status = ?2",
            params![run_id, status.as_str()],
            |row| row.get(0),
        )?)
    }

    pub fn visit_count(&self, run_id: &str) -> GenResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM visit WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?)
    }

    pub fn addon_count(&self, run_id: &str) -> GenResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM addon WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?)
    }

    /// Visits whose check-in date falls outside the owning subscription's
    /// active window. Zero for any dataset this crate generates.
    pub fn visits_outside_membership(&self, run_id: &str, horizon_end: &str) -> GenResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM visit v
             JOIN subscription s ON s.run_id = v.run_id AND s.customer_id = v.customer_id
             WHERE v.run_id = ?1
               AND (date(v.checkin_ts) < s.start_date
                    OR date(v.checkin_ts) > COALESCE(s.end_date, ?2))",
            params![run_id, horizon_end],
            |row| row.get(0),
        )?)
    }
}
