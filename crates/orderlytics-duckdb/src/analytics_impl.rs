//! [`OrderAnalytics`] trait impl — thin delegation to the query modules.

use anyhow::Result;

use orderlytics_core::analytics::{
    CategorySalesRow, DailyOrdersRow, DailySpendRow, DateRange, OrderAnalytics, OrderDateRange,
    ReviewDistribution, RfmRow, StateCustomerCounts, Summary,
};

use crate::queries;
use crate::DuckDbBackend;

#[async_trait::async_trait]
impl OrderAnalytics for DuckDbBackend {
    async fn daily_orders(&self, range: &DateRange) -> Result<Vec<DailyOrdersRow>> {
        self.daily_orders_inner(range).await
    }

    async fn daily_spend(&self, range: &DateRange) -> Result<Vec<DailySpendRow>> {
        self.daily_spend_inner(range).await
    }

    async fn category_sales(&self, range: &DateRange) -> Result<Vec<CategorySalesRow>> {
        queries::categories::category_sales_inner(self, range).await
    }

    async fn review_distribution(&self, range: &DateRange) -> Result<ReviewDistribution> {
        queries::reviews::review_distribution_inner(self, range).await
    }

    async fn rfm_table(&self, range: &DateRange) -> Result<Vec<RfmRow>> {
        queries::rfm::rfm_table_inner(self, range).await
    }

    async fn state_customer_counts(&self, range: &DateRange) -> Result<StateCustomerCounts> {
        queries::states::state_customer_counts_inner(self, range).await
    }

    async fn summary(&self, range: &DateRange) -> Result<Summary> {
        self.summary_inner(range).await
    }

    async fn order_date_range(&self) -> Result<OrderDateRange> {
        self.order_date_range_inner().await
    }
}
