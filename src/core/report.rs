//! Report generation business logic.
//!
//! This module derives everything the order page shows from a store snapshot:
//! the dashboard counters and one table per category with the display columns,
//! the status badge and the "time passed" text. All functions are pure and return
//! structured data that the presentation layer formats as it likes; the text
//! rendering used by the binary lives in the `Display` impl of [`OrderTable`].

use crate::{
    config::ledger::LedgerConfig,
    core::{
        filter::StatusFilter,
        order::{Game, Order, OrderDetails, OrderStatus},
        status::{TimePassed, elapsed},
        store::OrderStore,
    },
};
use chrono::{DateTime, Local, Utc};
use std::fmt::{self, Write as _};

/// Header counters shown above the tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dashboard {
    /// Every order in the ledger, regardless of filters
    pub total: usize,
    /// Orders waiting to be started
    pub unpending: usize,
    /// Orders being fulfilled
    pub processing: usize,
}

impl Dashboard {
    /// Counts `orders`; filters never apply here.
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        orders
            .into_iter()
            .fold(Self::default(), |mut dashboard, order| {
                dashboard.total += 1;
                match order.status {
                    OrderStatus::Unpending => dashboard.unpending += 1,
                    OrderStatus::Processing => dashboard.processing += 1,
                    _ => {}
                }
                dashboard
            })
    }
}

/// One displayed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    /// Position in the full ledger, for edit and delete
    pub index: usize,
    /// Creation date in local time
    pub date: String,
    /// Customer's Facebook name
    pub facebook: String,
    /// Username / in-game name
    pub username: String,
    /// Game-specific columns, in header order
    pub details: Vec<String>,
    /// Price with currency symbol
    pub price: String,
    /// Status badge
    pub status: OrderStatus,
    /// Age of the order
    pub time_passed: TimePassed,
}

impl OrderRow {
    /// Projects `order` (found at `index`) into its display columns.
    #[must_use]
    pub fn project(index: usize, order: &Order, now: DateTime<Utc>, config: &LedgerConfig) -> Self {
        let details = match &order.details {
            OrderDetails::Roblox(roblox) => vec![
                roblox.amount.clone(),
                roblox.payment.to_string(),
                roblox.speed.to_string(),
            ],
            OrderDetails::Ml(ml) => vec![
                ml.id.clone(),
                ml.server.clone(),
                ml.item_type.to_string(),
                ml.payment_status.to_string(),
            ],
        };

        Self {
            index,
            date: format_order_date(order.date, &config.date_format),
            facebook: order.facebook.clone(),
            username: order.username.clone(),
            details,
            price: format_price(&order.price, &config.currency_symbol),
            status: order.status,
            time_passed: elapsed(order, now),
        }
    }

    /// Every cell of the row, matching [`headers`].
    #[must_use]
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.index.to_string(),
            self.date.clone(),
            self.facebook.clone(),
            self.username.clone(),
        ];
        cells.extend(self.details.iter().cloned());
        cells.push(self.price.clone());
        cells.push(self.status.to_string());
        cells.push(self.time_passed.to_string());
        cells
    }
}

/// Column headers of a category's table.
#[must_use]
pub const fn headers(game: Game) -> &'static [&'static str] {
    match game {
        Game::Roblox => &[
            "#", "Date", "Facebook", "Username", "Amount", "Payment", "Speed", "Price", "Status",
            "Time Passed",
        ],
        Game::Ml => &[
            "#",
            "Date",
            "Facebook",
            "IGN",
            "ID",
            "Server",
            "Type",
            "Payment",
            "Price",
            "Status",
            "Time Passed",
        ],
    }
}

/// A category's table after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTable {
    /// Category shown
    pub game: Game,
    /// Filter that produced the rows
    pub filter: StatusFilter,
    /// Visible rows, newest first
    pub rows: Vec<OrderRow>,
}

/// Builds the filtered table for `game` as of `now`.
#[must_use]
pub fn generate_table(
    store: &OrderStore,
    game: Game,
    now: DateTime<Utc>,
    config: &LedgerConfig,
) -> OrderTable {
    OrderTable {
        game,
        filter: store.filter(game),
        rows: store
            .visible(game)
            .map(|(index, order)| OrderRow::project(index, order, now, config))
            .collect(),
    }
}

impl fmt::Display for OrderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} orders (filter: {})", self.game, self.filter)?;

        let headers = headers(self.game);
        let rows: Vec<Vec<String>> = self.rows.iter().map(OrderRow::cells).collect();
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(column, header)| {
                rows.iter()
                    .filter_map(|cells| cells.get(column))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let header_cells: Vec<String> = headers.iter().map(ToString::to_string).collect();
        write_line(f, &header_cells, &widths)?;
        if rows.is_empty() {
            return writeln!(f, "(no orders)");
        }
        for cells in &rows {
            write_line(f, cells, &widths)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

/// Formats a creation timestamp as a local date.
///
/// An unusable format string falls back to ISO dates rather than failing the render.
#[must_use]
pub fn format_order_date(date: DateTime<Utc>, format: &str) -> String {
    let local = date.with_timezone(&Local);
    let mut formatted = String::new();
    if write!(formatted, "{}", local.format(format)).is_err() {
        tracing::warn!("Invalid date format {:?}, using %Y-%m-%d", format);
        return local.format("%Y-%m-%d").to_string();
    }
    formatted
}

/// Prefixes a price with the currency symbol.
#[must_use]
pub fn format_price(price: &str, currency_symbol: &str) -> String {
    format!("{currency_symbol}{price}")
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}  Unpending: {}  Processing: {}",
            self.total, self.unpending, self.processing
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Result;
    use crate::test_utils::{ml_draft, roblox_draft, setup_test_store, timestamp};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_dashboard_counts_every_order() {
        let orders: Vec<Order> = [
            OrderStatus::Unpending,
            OrderStatus::Unpending,
            OrderStatus::Processing,
            OrderStatus::Done,
            OrderStatus::Cancelled,
        ]
        .into_iter()
        .map(|status| ml_draft(status).into_order(timestamp(0)))
        .collect();

        let dashboard = Dashboard::from_orders(&orders);

        assert_eq!(
            dashboard,
            Dashboard {
                total: 5,
                unpending: 2,
                processing: 1,
            }
        );
        assert_eq!(dashboard.to_string(), "Total: 5  Unpending: 2  Processing: 1");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("250", "₱"), "₱250");
        assert_eq!(format_price("99.50", "PHP "), "PHP 99.50");
    }

    #[test]
    fn test_format_order_date_uses_format() {
        let date = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(format_order_date(date, "%Y-%m"), "2025-06");
    }

    #[test]
    fn test_format_order_date_survives_bad_format() {
        let date = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert!(format_order_date(date, "%Q").starts_with("2025-06-"));
    }

    #[test]
    fn test_project_roblox_row() {
        let order = roblox_draft(OrderStatus::Processing).into_order(timestamp(0));
        let now = order.date + Duration::minutes(90);

        let row = OrderRow::project(3, &order, now, &LedgerConfig::default());

        assert_eq!(row.index, 3);
        assert_eq!(row.details, vec!["1000", "NCT", "FAST"]);
        assert_eq!(row.price, "₱350");
        assert_eq!(row.time_passed.to_string(), "1 Hrs");
        assert_eq!(row.cells().len(), headers(Game::Roblox).len());
    }

    #[test]
    fn test_project_ml_row() {
        let order = ml_draft(OrderStatus::Cancelled).into_order(timestamp(0));

        let row = OrderRow::project(0, &order, timestamp(0), &LedgerConfig::default());

        assert_eq!(row.details, vec!["98765432", "1203", "Starlight", "NOT PAID"]);
        assert_eq!(row.time_passed, TimePassed::NotApplicable);
        assert_eq!(row.cells().len(), headers(Game::Ml).len());
    }

    #[tokio::test]
    async fn test_generate_table_applies_filter() -> Result<()> {
        let mut store = setup_test_store().await?;
        store.add(roblox_draft(OrderStatus::Done)).await?;
        store.add(ml_draft(OrderStatus::Unpending)).await?;
        store.add(roblox_draft(OrderStatus::Unpending)).await?;
        store.set_filter(Game::Roblox, StatusFilter::Only(OrderStatus::Done));

        let config = LedgerConfig::default();
        let roblox = generate_table(&store, Game::Roblox, Utc::now(), &config);
        let ml = generate_table(&store, Game::Ml, Utc::now(), &config);

        assert_eq!(roblox.rows.len(), 1);
        assert_eq!(roblox.rows[0].index, 2);
        assert_eq!(roblox.rows[0].time_passed.to_string(), "0 Days");
        assert_eq!(ml.rows.len(), 1);
        assert_eq!(ml.filter, StatusFilter::All);

        let rendered = roblox.to_string();
        assert!(rendered.starts_with("Roblox orders (filter: DONE)"));
        assert!(rendered.contains("Time Passed"));
        assert!(rendered.contains("₱350"));
        Ok(())
    }

    #[test]
    fn test_empty_table_renders_placeholder() {
        let table = OrderTable {
            game: Game::Ml,
            filter: StatusFilter::All,
            rows: Vec::new(),
        };

        assert!(table.to_string().ends_with("(no orders)\n"));
    }
}
