//! Per-category status filters for the order tables.

use crate::core::order::{Game, Order, OrderStatus};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Restricts a table to one status, or lets everything through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum StatusFilter {
    /// Every order passes
    #[default]
    All,
    /// Only orders with this status pass
    Only(OrderStatus),
}

impl StatusFilter {
    /// Whether `order` passes this filter.
    #[must_use]
    pub fn matches(self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => order.status == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    /// Parses a filter setting; anything other than `ALL` or a status name is a
    /// configuration error.
    fn from_str(s: &str) -> Result<Self> {
        if s == "ALL" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only).map_err(|e| Error::Config {
            message: format!("Invalid status filter: {e}"),
        })
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// The filter currently selected for each category; unset categories show `ALL`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(HashMap<Game, StatusFilter>);

impl Filters {
    /// Filter selected for `game`.
    #[must_use]
    pub fn get(&self, game: Game) -> StatusFilter {
        self.0.get(&game).copied().unwrap_or_default()
    }

    /// Selects `filter` for `game`.
    pub fn set(&mut self, game: Game, filter: StatusFilter) {
        self.0.insert(game, filter);
    }

    /// Whether `order` shows up in its own category's table.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        self.get(order.game()).matches(order)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{ml_draft, roblox_draft, timestamp};

    #[test]
    fn test_filter_done_keeps_relative_order() {
        let orders: Vec<Order> = [
            OrderStatus::Unpending,
            OrderStatus::Done,
            OrderStatus::Done,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, status)| {
            let mut order = roblox_draft(status).into_order(timestamp(i as i64));
            order.username = format!("player{i}");
            order
        })
        .collect();

        let done: Vec<&Order> = orders
            .iter()
            .filter(|o| StatusFilter::Only(OrderStatus::Done).matches(o))
            .collect();

        assert_eq!(done.len(), 2);
        assert_eq!(done[0].username, "player1");
        assert_eq!(done[1].username, "player2");
    }

    #[test]
    fn test_all_matches_everything() {
        for status in OrderStatus::ALL {
            let order = ml_draft(status).into_order(timestamp(0));
            assert!(StatusFilter::All.matches(&order));
        }
    }

    #[test]
    fn test_filters_default_to_all_and_are_independent() {
        let mut filters = Filters::default();
        assert_eq!(filters.get(Game::Roblox), StatusFilter::All);
        assert_eq!(filters.get(Game::Ml), StatusFilter::All);

        filters.set(Game::Ml, StatusFilter::Only(OrderStatus::Delayed));

        let roblox = roblox_draft(OrderStatus::Processing).into_order(timestamp(0));
        let ml_delayed = ml_draft(OrderStatus::Delayed).into_order(timestamp(0));
        let ml_processing = ml_draft(OrderStatus::Processing).into_order(timestamp(0));

        assert!(filters.matches(&roblox));
        assert!(filters.matches(&ml_delayed));
        assert!(!filters.matches(&ml_processing));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("ALL".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "CANCELLED".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(OrderStatus::Cancelled)
        );
        assert!(matches!(
            "all".parse::<StatusFilter>(),
            Err(Error::Config { .. })
        ));
        assert_eq!(StatusFilter::Only(OrderStatus::Done).to_string(), "DONE");
        assert_eq!(StatusFilter::All.to_string(), "ALL");
    }
}
