use chrono::{NaiveDate, NaiveDateTime};

use orderlytics_core::analytics::{DateRange, OrderAnalytics};
use orderlytics_core::error::AnalyticsError;
use orderlytics_core::order::OrderRecord;
use orderlytics_duckdb::DuckDbBackend;

fn approved(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(12, 0, 0))
}

fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(start.0, start.1, start.2).expect("start"),
        NaiveDate::from_ymd_opt(end.0, end.1, end.2).expect("end"),
    )
    .expect("range")
}

#[allow(clippy::too_many_arguments)]
fn line(
    order_id: &str,
    customer_id: &str,
    state: Option<&str>,
    category: Option<&str>,
    payment: f64,
    order_approved_at: Option<NaiveDateTime>,
    score: Option<i64>,
) -> OrderRecord {
    OrderRecord {
        order_id: order_id.to_string(),
        customer_id: customer_id.to_string(),
        customer_state: state.map(str::to_string),
        product_id: Some(format!("prod_{order_id}")),
        product_category_name_english: category.map(str::to_string),
        payment_value: payment,
        order_approved_at,
        review_score: score,
    }
}

async fn seeded_db(records: Vec<OrderRecord>) -> DuckDbBackend {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    db.insert_orders(&records).await.expect("seed orders");
    db
}

fn is_empty_range(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AnalyticsError>(),
        Some(AnalyticsError::EmptyRange)
    )
}

// ============================================================
// Daily orders: distinct order counting, additive revenue
// ============================================================
#[tokio::test]
async fn daily_orders_counts_distinct_orders_and_sums_lines() {
    // Three lines, two orders, same day: order A has two payment lines.
    let db = seeded_db(vec![
        line("A", "c1", Some("SP"), Some("toys"), 10.0, approved(2018, 3, 1), Some(5)),
        line("A", "c1", Some("SP"), Some("toys"), 5.0, approved(2018, 3, 1), Some(5)),
        line("B", "c2", Some("RJ"), Some("auto"), 20.0, approved(2018, 3, 1), Some(4)),
    ])
    .await;

    let rows = db
        .daily_orders(&range((2018, 3, 1), (2018, 3, 1)))
        .await
        .expect("daily orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].day, "2018-03-01");
    assert_eq!(rows[0].order_count, 2);
    assert!((rows[0].revenue - 35.0).abs() < 1e-9);
}

#[tokio::test]
async fn daily_orders_skips_days_without_rows() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 10.0, approved(2018, 3, 1), None),
        line("B", "c2", None, None, 20.0, approved(2018, 3, 5), None),
    ])
    .await;

    let rows = db
        .daily_orders(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("daily orders");
    // No zero-filling: 2018-03-02..04 are absent, not zero.
    let days: Vec<&str> = rows.iter().map(|r| r.day.as_str()).collect();
    assert_eq!(days, vec!["2018-03-01", "2018-03-05"]);

    let total: i64 = rows.iter().map(|r| r.order_count).sum();
    assert_eq!(total, 2); // equals distinct order_id count in range
}

#[tokio::test]
async fn daily_orders_range_is_inclusive_of_end_date() {
    let db = seeded_db(vec![line(
        "A",
        "c1",
        None,
        None,
        10.0,
        approved(2018, 3, 31),
        None,
    )])
    .await;

    let rows = db
        .daily_orders(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("daily orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].day, "2018-03-31");
}

#[tokio::test]
async fn null_approved_rows_never_reach_temporal_aggregation() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 10.0, approved(2018, 3, 1), None),
        line("B", "c2", None, None, 99.0, None, None),
    ])
    .await;

    let rows = db
        .daily_orders(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("daily orders");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_count, 1);
    assert!((rows[0].revenue - 10.0).abs() < 1e-9);
}

// ============================================================
// Daily spend: sum conservation
// ============================================================
#[tokio::test]
async fn daily_spend_total_matches_payment_sum() {
    let payments = [12.5, 7.25, 100.0, 0.99];
    let db = seeded_db(vec![
        line("A", "c1", None, None, payments[0], approved(2018, 3, 1), None),
        line("A", "c1", None, None, payments[1], approved(2018, 3, 1), None),
        line("B", "c2", None, None, payments[2], approved(2018, 3, 2), None),
        line("C", "c3", None, None, payments[3], approved(2018, 3, 9), None),
    ])
    .await;

    let rows = db
        .daily_spend(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("daily spend");
    let total: f64 = rows.iter().map(|r| r.total_spend).sum();
    let expected: f64 = payments.iter().sum();
    assert!((total - expected).abs() < 1e-9);
}

// ============================================================
// Category sales: descending, null key retained, count conservation
// ============================================================
#[tokio::test]
async fn category_sales_sorted_descending_with_null_key_retained() {
    let db = seeded_db(vec![
        line("A", "c1", None, Some("toys"), 1.0, approved(2018, 3, 1), None),
        line("B", "c2", None, Some("toys"), 1.0, approved(2018, 3, 1), None),
        line("C", "c3", None, Some("auto"), 1.0, approved(2018, 3, 1), None),
        line("D", "c4", None, None, 1.0, approved(2018, 3, 1), None),
    ])
    .await;

    let rows = db
        .category_sales(&range((2018, 3, 1), (2018, 3, 1)))
        .await
        .expect("category sales");

    assert!(rows.windows(2).all(|w| w[0].product_count >= w[1].product_count));
    assert_eq!(rows[0].category.as_deref(), Some("toys"));
    assert_eq!(rows[0].product_count, 2);
    // NULL category is a real group, not dropped.
    assert!(rows.iter().any(|r| r.category.is_none() && r.product_count == 1));

    let total: i64 = rows.iter().map(|r| r.product_count).sum();
    assert_eq!(total, 4); // equals row count of the filtered table
}

#[tokio::test]
async fn category_sales_ties_break_by_category_name() {
    let db = seeded_db(vec![
        line("A", "c1", None, Some("zebra"), 1.0, approved(2018, 3, 1), None),
        line("B", "c2", None, Some("auto"), 1.0, approved(2018, 3, 1), None),
    ])
    .await;

    let rows = db
        .category_sales(&range((2018, 3, 1), (2018, 3, 1)))
        .await
        .expect("category sales");
    assert_eq!(rows[0].category.as_deref(), Some("auto"));
    assert_eq!(rows[1].category.as_deref(), Some("zebra"));
}

// ============================================================
// Review distribution: frequencies and documented mode tie-break
// ============================================================
#[tokio::test]
async fn review_distribution_orders_by_frequency() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 1.0, approved(2018, 3, 1), Some(5)),
        line("B", "c2", None, None, 1.0, approved(2018, 3, 1), Some(5)),
        line("C", "c3", None, None, 1.0, approved(2018, 3, 1), Some(1)),
    ])
    .await;

    let dist = db
        .review_distribution(&range((2018, 3, 1), (2018, 3, 1)))
        .await
        .expect("reviews");
    assert_eq!(dist.most_common_score, 5);
    assert_eq!(dist.rows[0].score, 5);
    assert_eq!(dist.rows[0].count, 2);
    assert_eq!(dist.rows[1].score, 1);
    assert_eq!(dist.rows[1].count, 1);
}

#[tokio::test]
async fn review_mode_tie_resolves_to_lowest_score() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 1.0, approved(2018, 3, 1), Some(4)),
        line("B", "c2", None, None, 1.0, approved(2018, 3, 1), Some(2)),
    ])
    .await;

    let dist = db
        .review_distribution(&range((2018, 3, 1), (2018, 3, 1)))
        .await
        .expect("reviews");
    assert_eq!(dist.most_common_score, 2);
}

#[tokio::test]
async fn review_distribution_without_scores_reports_no_data() {
    let db = seeded_db(vec![line(
        "A",
        "c1",
        None,
        None,
        1.0,
        approved(2018, 3, 1),
        None,
    )])
    .await;

    let err = db
        .review_distribution(&range((2018, 3, 1), (2018, 3, 1)))
        .await
        .expect_err("mode undefined without scores");
    assert!(is_empty_range(&err));
}

// ============================================================
// RFM: recency against the filtered-range maximum
// ============================================================
#[tokio::test]
async fn rfm_recency_frequency_monetary() {
    // c1 orders on day 1 and day 5 (global max), c2 only on day 1.
    let db = seeded_db(vec![
        line("A", "c1", None, None, 10.0, approved(2018, 3, 1), None),
        line("B", "c1", None, None, 30.0, approved(2018, 3, 5), None),
        line("C", "c2", None, None, 20.0, approved(2018, 3, 1), None),
    ])
    .await;

    let rows = db
        .rfm_table(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("rfm");
    assert_eq!(rows.len(), 2);

    let c1 = rows.iter().find(|r| r.customer_id == "c1").expect("c1");
    assert_eq!(c1.recency_days, 0);
    assert_eq!(c1.frequency, 2);
    assert!((c1.monetary - 40.0).abs() < 1e-9);

    let c2 = rows.iter().find(|r| r.customer_id == "c2").expect("c2");
    assert_eq!(c2.recency_days, 4);
    assert_eq!(c2.frequency, 1);
    assert!((c2.monetary - 20.0).abs() < 1e-9);

    assert!(rows.iter().all(|r| r.recency_days >= 0));
}

#[tokio::test]
async fn rfm_recency_follows_the_filter_not_the_dataset() {
    // A later order exists outside the filter; recency must be measured
    // against the maximum inside the filtered range only.
    let db = seeded_db(vec![
        line("A", "c1", None, None, 10.0, approved(2018, 3, 5), None),
        line("B", "c2", None, None, 10.0, approved(2018, 4, 20), None),
    ])
    .await;

    let rows = db
        .rfm_table(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("rfm");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].customer_id, "c1");
    assert_eq!(rows[0].recency_days, 0);
}

#[tokio::test]
async fn rfm_counts_orders_distinctly_per_customer() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 10.0, approved(2018, 3, 1), None),
        line("A", "c1", None, None, 5.0, approved(2018, 3, 1), None),
    ])
    .await;

    let rows = db
        .rfm_table(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("rfm");
    assert_eq!(rows[0].frequency, 1);
    assert!((rows[0].monetary - 15.0).abs() < 1e-9);
}

// ============================================================
// State customer counts
// ============================================================
#[tokio::test]
async fn state_counts_distinct_customers_and_conserve_total() {
    let db = seeded_db(vec![
        line("A", "c1", Some("SP"), None, 1.0, approved(2018, 3, 1), None),
        line("B", "c1", Some("SP"), None, 1.0, approved(2018, 3, 2), None),
        line("C", "c2", Some("SP"), None, 1.0, approved(2018, 3, 1), None),
        line("D", "c3", Some("RJ"), None, 1.0, approved(2018, 3, 1), None),
    ])
    .await;

    let counts = db
        .state_customer_counts(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("states");
    assert_eq!(counts.most_common_state.as_deref(), Some("SP"));
    assert!(counts
        .rows
        .windows(2)
        .all(|w| w[0].customer_count >= w[1].customer_count));

    // c1 appears twice in SP but is one customer.
    let sp = counts
        .rows
        .iter()
        .find(|r| r.state.as_deref() == Some("SP"))
        .expect("SP row");
    assert_eq!(sp.customer_count, 2);

    let total: i64 = counts.rows.iter().map(|r| r.customer_count).sum();
    assert_eq!(total, 3); // distinct customer_id count in range
}

#[tokio::test]
async fn state_tie_resolves_to_first_lexicographic_state() {
    let db = seeded_db(vec![
        line("A", "c1", Some("RJ"), None, 1.0, approved(2018, 3, 1), None),
        line("B", "c2", Some("AC"), None, 1.0, approved(2018, 3, 1), None),
    ])
    .await;

    let counts = db
        .state_customer_counts(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("states");
    assert_eq!(counts.most_common_state.as_deref(), Some("AC"));
}

// ============================================================
// Summary and date bounds
// ============================================================
#[tokio::test]
async fn summary_headline_metrics() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 10.0, approved(2018, 3, 1), Some(5)),
        line("A", "c1", None, None, 5.0, approved(2018, 3, 1), Some(5)),
        line("B", "c2", None, None, 25.0, approved(2018, 3, 3), Some(3)),
    ])
    .await;

    let summary = db
        .summary(&range((2018, 3, 1), (2018, 3, 31)))
        .await
        .expect("summary");
    assert_eq!(summary.total_orders, 2);
    assert_eq!(summary.total_items, 3);
    assert!((summary.total_revenue - 40.0).abs() < 1e-9);
    // Spend is the same payment sum the daily-spend view totals to.
    assert!((summary.total_spend - 40.0).abs() < 1e-9);
    // Two active days: 40 / 2.
    assert!((summary.avg_daily_spend - 20.0).abs() < 1e-9);
    assert!((summary.avg_review_score - 13.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn order_date_range_spans_non_null_approvals_only() {
    let db = seeded_db(vec![
        line("A", "c1", None, None, 1.0, approved(2018, 1, 15), None),
        line("B", "c2", None, None, 1.0, approved(2018, 6, 2), None),
        line("C", "c3", None, None, 1.0, None, None),
    ])
    .await;

    let bounds = db.order_date_range().await.expect("bounds");
    assert_eq!(bounds.min_date, "2018-01-15");
    assert_eq!(bounds.max_date, "2018-06-02");
}

// ============================================================
// Empty range: every view reports it explicitly
// ============================================================
#[tokio::test]
async fn every_view_reports_empty_range() {
    let db = seeded_db(vec![line(
        "A",
        "c1",
        Some("SP"),
        Some("toys"),
        10.0,
        approved(2018, 3, 1),
        Some(5),
    )])
    .await;
    // Filter to a window with no rows at all.
    let r = range((2019, 1, 1), (2019, 1, 31));

    assert!(is_empty_range(&db.daily_orders(&r).await.expect_err("daily_orders")));
    assert!(is_empty_range(&db.daily_spend(&r).await.expect_err("daily_spend")));
    assert!(is_empty_range(&db.category_sales(&r).await.expect_err("category_sales")));
    assert!(is_empty_range(
        &db.review_distribution(&r).await.expect_err("review_distribution")
    ));
    assert!(is_empty_range(&db.rfm_table(&r).await.expect_err("rfm_table")));
    assert!(is_empty_range(
        &db.state_customer_counts(&r).await.expect_err("state_customer_counts")
    ));
    assert!(is_empty_range(&db.summary(&r).await.expect_err("summary")));
}

#[tokio::test]
async fn order_date_range_on_empty_dataset_reports_no_data() {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    let err = db.order_date_range().await.expect_err("no data");
    assert!(is_empty_range(&err));
}

// ============================================================
// Idempotence: views are pure functions of the filtered table
// ============================================================
#[tokio::test]
async fn views_are_idempotent_across_calls() {
    let db = seeded_db(vec![
        line("A", "c1", Some("SP"), Some("toys"), 10.0, approved(2018, 3, 1), Some(5)),
        line("B", "c2", Some("RJ"), Some("auto"), 20.0, approved(2018, 3, 2), Some(4)),
    ])
    .await;
    let r = range((2018, 3, 1), (2018, 3, 31));

    let first = db.daily_orders(&r).await.expect("first call");
    let second = db.daily_orders(&r).await.expect("second call");
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.day, b.day);
        assert_eq!(a.order_count, b.order_count);
        assert!((a.revenue - b.revenue).abs() < 1e-9);
    }

    let rfm_first = db.rfm_table(&r).await.expect("first rfm");
    let rfm_second = db.rfm_table(&r).await.expect("second rfm");
    assert_eq!(rfm_first.len(), rfm_second.len());
    for (a, b) in rfm_first.iter().zip(rfm_second.iter()) {
        assert_eq!(a.customer_id, b.customer_id);
        assert_eq!(a.recency_days, b.recency_days);
        assert_eq!(a.frequency, b.frequency);
    }
}
