//! CSV emitter: one comma-delimited file per table.
//!
//! Every file carries its header row, even when the table is empty.

use crate::{
    addon_sampler::AddonRecord,
    customer_generator::CustomerRecord,
    dataset::{Dataset, FixedCostRecord, PlanRecord},
    error::GenResult,
    subscription_simulator::SubscriptionRecord,
    visit_simulator::VisitRecord,
};
use serde::Serialize;
use std::{fs, io::Write, path::Path};

/// A row type with a fixed file name and column order.
pub trait TableRow: Serialize {
    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];
}

impl TableRow for CustomerRecord {
    const FILE_NAME: &'static str = "customers.csv";
    const HEADERS: &'static [&'static str] =
        &["customer_id", "signup_date", "age", "gender", "segment"];
}

impl TableRow for PlanRecord {
    const FILE_NAME: &'static str = "plans.csv";
    const HEADERS: &'static [&'static str] =
        &["plan_id", "plan_name", "monthly_price", "access_type"];
}

impl TableRow for SubscriptionRecord {
    const FILE_NAME: &'static str = "subscriptions.csv";
    const HEADERS: &'static [&'static str] = &[
        "subscription_id",
        "customer_id",
        "plan_id",
        "start_date",
        "end_date",
        "status",
    ];
}

impl TableRow for AddonRecord {
    const FILE_NAME: &'static str = "addons.csv";
    const HEADERS: &'static [&'static str] = &["customer_id", "addon_type", "monthly_price"];
}

impl TableRow for VisitRecord {
    const FILE_NAME: &'static str = "visits.csv";
    const HEADERS: &'static [&'static str] =
        &["visit_id", "customer_id", "checkin_ts", "checkout_ts", "duration_min"];
}

impl TableRow for FixedCostRecord {
    const FILE_NAME: &'static str = "fixed_costs.csv";
    const HEADERS: &'static [&'static str] = &["cost_type", "monthly_cost"];
}

/// Write one table (header + rows) to any writer.
pub fn write_table<W: Write, R: TableRow>(writer: W, rows: &[R]) -> GenResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(R::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render one table to bytes.
pub fn table_bytes<R: TableRow>(rows: &[R]) -> GenResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_table(&mut buf, rows)?;
    Ok(buf)
}

fn write_file<R: TableRow>(dir: &Path, rows: &[R]) -> GenResult<()> {
    let path = dir.join(R::FILE_NAME);
    let file = fs::File::create(&path)?;
    write_table(std::io::BufWriter::new(file), rows)?;
    log::debug!("export: wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write all six tables into `out_dir`, creating it if absent.
pub fn write_dataset(dataset: &Dataset, out_dir: &Path) -> GenResult<()> {
    fs::create_dir_all(out_dir)?;
    write_file(out_dir, &dataset.customers)?;
    write_file(out_dir, &dataset.plans)?;
    write_file(out_dir, &dataset.subscriptions)?;
    write_file(out_dir, &dataset.addons)?;
    write_file(out_dir, &dataset.visits)?;
    write_file(out_dir, &dataset.fixed_costs)?;
    log::info!("export: wrote 6 tables to {}", out_dir.display());
    Ok(())
}
