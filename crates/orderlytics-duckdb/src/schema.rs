/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup (idempotent).
///
/// `memory_limit` is passed at runtime from `Config.duckdb_memory_limit`
/// (env `ORDERLYTICS_DUCKDB_MEMORY`, default `"1GB"`). DuckDB accepts any
/// size string it supports — e.g. `"512MB"`, `"1GB"`, `"4GB"`. An explicit
/// limit is always set; the DuckDB default (80% of system RAM) is not
/// acceptable for a server process. `SET threads = 2` bounds the background
/// thread pool for single-writer embedded use.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- ORDERS (denormalized: one row per item/payment line)
-- ===========================================
-- order_id and customer_id repeat across lines of the same order;
-- distinct-count semantics live in the query layer, not the schema.
-- order_approved_at is nullable: unapproved orders are stored but excluded
-- from every date-range predicate.
CREATE TABLE IF NOT EXISTS orders (
    order_id                        VARCHAR NOT NULL,
    customer_id                     VARCHAR NOT NULL,
    customer_state                  VARCHAR(2),
    product_id                      VARCHAR,
    product_category_name_english   VARCHAR,
    payment_value                   DOUBLE NOT NULL,
    order_approved_at               TIMESTAMP,
    review_score                    INTEGER
);
-- Every view filters on the approval timestamp first.
CREATE INDEX IF NOT EXISTS idx_orders_approved_at ON orders(order_approved_at);
CREATE INDEX IF NOT EXISTS idx_orders_customer    ON orders(customer_id);

-- ===========================================
-- GEOLOCATION (served verbatim to the renderer's map)
-- ===========================================
CREATE TABLE IF NOT EXISTS geolocation (
    zip_code_prefix VARCHAR,
    lat             DOUBLE NOT NULL,
    lng             DOUBLE NOT NULL,
    city            VARCHAR,
    state           VARCHAR(2)
);
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_sql_embeds_memory_limit() {
        let sql = init_sql("512MB");
        assert!(sql.contains("SET memory_limit = '512MB';"));
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS orders"));
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS geolocation"));
    }
}
