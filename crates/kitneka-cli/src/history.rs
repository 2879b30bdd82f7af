//! `history` command: price observations per store, newest first.

use chrono::NaiveDateTime;
use kitneka_client::DiscoveryClient;
use kitneka_core::{flatten_history, lowest_point, HistoryRange, HistoryRow};

/// Formats a history date for display, falling back to the raw value.
fn fmt_date(date: Option<NaiveDateTime>, raw: &str) -> String {
    date.map_or_else(
        || raw.to_string(),
        |d| d.format("%a, %d %b %Y").to_string(),
    )
}

pub(crate) fn format_history_row(row: &HistoryRow) -> String {
    format!(
        "{}  {}  ₹{:.0}",
        fmt_date(row.date, &row.raw_date),
        row.store,
        row.price
    )
}

/// Fetches and prints price history for `product_id` over `range`.
///
/// # Errors
///
/// Returns an error if the history request fails.
pub(crate) async fn run_history(
    client: &DiscoveryClient,
    product_id: &str,
    range: HistoryRange,
) -> anyhow::Result<()> {
    let series = client.price_history(product_id, range).await?;
    let rows = flatten_history(&series);
    tracing::info!(
        product_id,
        days = range.days(),
        stores = series.len(),
        points = rows.len(),
        "price history loaded"
    );

    if rows.is_empty() {
        println!("No history data available.");
        return Ok(());
    }

    if let Some(low) = lowest_point(&series) {
        println!("Lowest in {} days: {}", range.days(), format_history_row(&low));
    }
    for row in &rows {
        println!("  {}", format_history_row(row));
    }

    Ok(())
}
