//! Analytics backend abstraction.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-day range every view is filtered to before aggregation.
///
/// Rows qualify when `order_approved_at` falls on `start_date..=end_date`.
/// Rows with a NULL `order_approved_at` never qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if end_date < start_date {
            return Err(anyhow!("end_date must be on or after start_date"));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }
}

/// One calendar day of order activity: distinct orders and summed payments.
/// Days with no qualifying rows are absent (no zero-filling).
#[derive(Debug, Clone, Serialize)]
pub struct DailyOrdersRow {
    pub day: String,
    pub order_count: i64,
    pub revenue: f64,
}

/// One calendar day of customer spend.
#[derive(Debug, Clone, Serialize)]
pub struct DailySpendRow {
    pub day: String,
    pub total_spend: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySalesRow {
    /// NULL category names are a real key in the data and are kept as-is.
    pub category: Option<String>,
    pub product_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewCountRow {
    pub score: i64,
    pub count: i64,
}

/// Review-score frequencies, descending by count. `most_common_score` is the
/// first row; frequency ties resolve to the lowest score.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDistribution {
    pub rows: Vec<ReviewCountRow>,
    pub most_common_score: i64,
}

/// Recency/Frequency/Monetary segmentation row for one customer.
#[derive(Debug, Clone, Serialize)]
pub struct RfmRow {
    pub customer_id: String,
    /// Whole days between this customer's latest approved order and the
    /// latest approved order anywhere in the filtered range. Non-negative by
    /// construction.
    pub recency_days: i64,
    /// Distinct order count.
    pub frequency: i64,
    /// Summed payment value.
    pub monetary: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateCountRow {
    pub state: Option<String>,
    pub customer_count: i64,
}

/// Distinct customers per state, descending by count. `most_common_state` is
/// the first row; count ties resolve to the lexicographically first state.
#[derive(Debug, Clone, Serialize)]
pub struct StateCustomerCounts {
    pub rows: Vec<StateCountRow>,
    pub most_common_state: Option<String>,
}

/// Headline metrics for the dashboard's summary cards.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub total_spend: f64,
    pub avg_daily_spend: f64,
    pub total_items: i64,
    pub avg_review_score: f64,
}

/// Min/max approved-order dates across the whole dataset; seeds the
/// renderer's date picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDateRange {
    pub min_date: String,
    pub max_date: String,
}

/// Read-only derived views over the orders table.
///
/// Every method recomputes from the rows inside `range` on each call — no
/// caching, no state between calls. An empty filtered table is reported as
/// [`crate::error::AnalyticsError::EmptyRange`] by every view.
#[async_trait::async_trait]
pub trait OrderAnalytics: Send + Sync + 'static {
    async fn daily_orders(&self, range: &DateRange) -> Result<Vec<DailyOrdersRow>>;

    async fn daily_spend(&self, range: &DateRange) -> Result<Vec<DailySpendRow>>;

    async fn category_sales(&self, range: &DateRange) -> Result<Vec<CategorySalesRow>>;

    async fn review_distribution(&self, range: &DateRange) -> Result<ReviewDistribution>;

    async fn rfm_table(&self, range: &DateRange) -> Result<Vec<RfmRow>>;

    async fn state_customer_counts(&self, range: &DateRange) -> Result<StateCustomerCounts>;

    async fn summary(&self, range: &DateRange) -> Result<Summary>;

    /// Dataset-wide bounds of `order_approved_at`, ignoring the range filter.
    async fn order_date_range(&self) -> Result<OrderDateRange>;
}
