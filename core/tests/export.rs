//! CSV emitter: headers, null handling, wire formats.

use chrono::NaiveDate;
use fitdata_core::{
    addon_sampler::AddonRecord,
    config::SimConfig,
    dataset::Dataset,
    engine::GenEngine,
    export::{table_bytes, write_dataset, TableRow},
    subscription_simulator::SubscriptionRecord,
    types::SubscriptionStatus,
    visit_simulator::VisitRecord,
};

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn empty_table_still_has_header() {
    let out = text(table_bytes::<AddonRecord>(&[]).unwrap());
    assert_eq!(out, "customer_id,addon_type,monthly_price\n");
}

#[test]
fn open_subscription_serializes_empty_end_date() {
    let rows = vec![
        SubscriptionRecord {
            subscription_id: 1,
            customer_id: 1,
            plan_id: 3,
            start_date: date(2023, 6, 1),
            end_date: Some(date(2023, 8, 1)),
            status: SubscriptionStatus::Canceled,
        },
        SubscriptionRecord {
            subscription_id: 2,
            customer_id: 2,
            plan_id: 1,
            start_date: date(2024, 3, 9),
            end_date: None,
            status: SubscriptionStatus::Active,
        },
    ];
    let out = text(table_bytes(&rows).unwrap());
    assert_eq!(
        out,
        "subscription_id,customer_id,plan_id,start_date,end_date,status\n\
         1,1,3,2023-06-01,2023-08-01,canceled\n\
         2,2,1,2024-03-09,,active\n"
    );
}

#[test]
fn visits_use_date_time_timestamps() {
    let checkin = date(2023, 6, 1).and_hms_opt(7, 5, 0).unwrap();
    let rows = vec![VisitRecord {
        visit_id: 1,
        customer_id: 4,
        checkin_ts: checkin,
        checkout_ts: checkin + chrono::Duration::minutes(70),
        duration_min: 70,
    }];
    let out = text(table_bytes(&rows).unwrap());
    assert_eq!(
        out,
        "visit_id,customer_id,checkin_ts,checkout_ts,duration_min\n\
         1,4,2023-06-01 07:05:00,2023-06-01 08:15:00,70\n"
    );
}

#[test]
fn catalogs_render_snake_case_categories() {
    let dataset = Dataset::with_catalogs(&SimConfig::default());
    let plans = text(table_bytes(&dataset.plans).unwrap());
    assert_eq!(
        plans,
        "plan_id,plan_name,monthly_price,access_type\n\
         1,Basic,2000,full\n\
         2,Premium,4500,full\n\
         3,Off-Peak,1000,off_peak\n\
         4,Student,1200,full\n"
    );
    let costs = text(table_bytes(&dataset.fixed_costs).unwrap());
    assert!(costs.starts_with("cost_type,monthly_cost\nrent,300000\n"));
}

#[test]
fn write_dataset_creates_directory_and_six_files() {
    let config = SimConfig { population: 25, ..SimConfig::default() };
    let dataset = GenEngine::build(42, config).unwrap().run().unwrap();

    let dir = std::env::temp_dir()
        .join(format!("fitdata-export-{}", std::process::id()))
        .join("raw");
    write_dataset(&dataset, &dir).unwrap();

    let files = [
        <fitdata_core::customer_generator::CustomerRecord as TableRow>::FILE_NAME,
        "plans.csv",
        "subscriptions.csv",
        "addons.csv",
        "visits.csv",
        "fixed_costs.csv",
    ];
    for name in files {
        assert!(dir.join(name).is_file(), "{name} missing");
    }

    let customers = std::fs::read_to_string(dir.join("customers.csv")).unwrap();
    assert_eq!(customers.lines().count(), 26, "header + 25 rows");
    assert!(customers.starts_with("customer_id,signup_date,age,gender,segment\n"));

    std::fs::remove_dir_all(dir.parent().unwrap()).ok();
}
