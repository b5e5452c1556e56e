use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::tempdir;
use tokio::runtime::Runtime;

use finance_tracker_server::aggregation::{
    SummaryOptions, YearFilter, YearMatch, summarize_home, summarize_savings_by_month_name,
};
use finance_tracker_server::auth::create_user;
use finance_tracker_server::database::{Db, init_db};
use finance_tracker_server::models::{
    Currency, Expense, ExpenseCategory, Income, IncomeSource,
};
use finance_tracker_server::records::{RecordFields, insert_record};
use finance_tracker_server::summaries::load_owner_records;

// Benchmark constants
const BENCH_YEAR: i32 = 2024;
const BENCH_RECORD_COUNT: usize = 1000;

fn bench_date(i: usize) -> String {
    format!("{}-{:02}-{:02}", BENCH_YEAR - (i % 2) as i32, i % 12 + 1, i % 28 + 1)
}

fn bench_currency(i: usize) -> Currency {
    if i % 3 == 0 { Currency::Dollar } else { Currency::Euro }
}

fn in_memory_records(count: usize) -> (Vec<Income>, Vec<Expense>) {
    let incomes = (0..count)
        .map(|i| Income {
            id: i.to_string(),
            owner_id: "bench".to_string(),
            source: IncomeSource::Salary,
            amount: 100.0 + (i % 50) as f64,
            currency: bench_currency(i),
            date_received: bench_date(i),
        })
        .collect();
    let expenses = (0..count)
        .map(|i| Expense {
            id: i.to_string(),
            owner_id: "bench".to_string(),
            category: ExpenseCategory::Food,
            amount: 10.0 + (i % 20) as f64,
            currency: bench_currency(i + 1),
            date_spent: bench_date(i + 5),
        })
        .collect();
    (incomes, expenses)
}

async fn setup_benchmark_environment() -> (Db, String, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let data_path = temp_dir.path().to_str().unwrap().to_string();
    let db = init_db(&data_path).await.unwrap();
    let user = create_user(&db, "bench", "bench@example.com", "secret123")
        .await
        .unwrap();

    (db, user.id, temp_dir)
}

async fn create_benchmark_records(db: &Db, owner_id: &str, count: usize) {
    for i in 0..count {
        let date = time::Date::from_calendar_date(2024, time::Month::March, (i % 28 + 1) as u8)
            .unwrap();
        let occurred_on = date.to_string();
        let fields = RecordFields {
            label: IncomeSource::Salary.as_str(),
            amount: 100.0 + (i % 50) as f64,
            currency: bench_currency(i),
            occurred_on: &occurred_on,
        };
        insert_record::<Income>(db, owner_id, &fields, date).await.unwrap();

        let fields = RecordFields {
            label: ExpenseCategory::Rent.as_str(),
            amount: 10.0 + (i % 20) as f64,
            currency: bench_currency(i + 1),
            occurred_on: &occurred_on,
        };
        insert_record::<Expense>(db, owner_id, &fields, date).await.unwrap();
    }
}

async fn benchmark_load_and_summarize(db: &Db, owner_id: &str) {
    let (incomes, expenses) = load_owner_records(db, owner_id).await.unwrap();
    let summary = summarize_home(&incomes, &expenses, BENCH_YEAR, SummaryOptions::default());
    black_box(summary);
}

fn criterion_benchmark(c: &mut Criterion) {
    let (incomes, expenses) = in_memory_records(BENCH_RECORD_COUNT);
    let filter = YearFilter::new(BENCH_YEAR, YearMatch::Calendar);

    c.bench_function("summarize_home", |b| {
        b.iter(|| {
            summarize_home(
                black_box(&incomes),
                black_box(&expenses),
                BENCH_YEAR,
                SummaryOptions::default(),
            )
        })
    });

    c.bench_function("summarize_savings_by_month_name", |b| {
        b.iter(|| {
            summarize_savings_by_month_name(black_box(&incomes), black_box(&expenses), &filter)
        })
    });

    let rt = Runtime::new().unwrap();

    // Setup benchmark data once
    let (db, owner_id, _temp_dir) = rt.block_on(setup_benchmark_environment());
    rt.block_on(create_benchmark_records(&db, &owner_id, BENCH_RECORD_COUNT));

    c.bench_function("load_and_summarize_home", |b| {
        b.to_async(&rt)
            .iter(|| benchmark_load_and_summarize(&db, &owner_id))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
