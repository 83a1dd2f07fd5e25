//! Status transitions and the "time passed" projection.
//!
//! Everything here is a pure function of an order and the wall-clock time the
//! caller passes in, so the store and the report share one source of truth for
//! when an order counts as complete and how long it has been open.

use crate::core::order::{Order, OrderStatus};
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Moves `order` to `new_status`, keeping the completion date in step.
///
/// Entering DONE stamps `now` as the completion date; re-asserting DONE keeps
/// the original stamp; any other status clears it.
pub fn apply_status_change(order: &mut Order, new_status: OrderStatus, now: DateTime<Utc>) {
    if new_status == OrderStatus::Done {
        if order.status != OrderStatus::Done {
            order.completion_date = Some(now);
        }
    } else {
        order.completion_date = None;
    }
    order.status = new_status;
}

/// Human-facing age of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePassed {
    /// Whole days (rounded up) from creation to completion
    CompletedIn(i64),
    /// Open for at least a day; floored
    Days(i64),
    /// Open for at least an hour; floored
    Hours(i64),
    /// Open for at least a minute; floored
    Minutes(i64),
    /// Created less than a minute ago
    Now,
    /// Cancelled, or DONE without a completion date
    NotApplicable,
}

impl fmt::Display for TimePassed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompletedIn(1) => write!(f, "1 Day"),
            Self::CompletedIn(days) | Self::Days(days) => write!(f, "{days} Days"),
            Self::Hours(hours) => write!(f, "{hours} Hrs"),
            Self::Minutes(minutes) => write!(f, "{minutes} Mins"),
            Self::Now => write!(f, "Now"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Computes how long `order` has taken (if DONE) or has been open (otherwise).
#[must_use]
pub fn elapsed(order: &Order, now: DateTime<Utc>) -> TimePassed {
    match (order.status, order.completion_date) {
        (OrderStatus::Done, Some(completed)) => {
            let span = (completed - order.date).max(TimeDelta::zero());
            let days = span.num_days();
            if span > TimeDelta::days(days) {
                TimePassed::CompletedIn(days + 1)
            } else {
                TimePassed::CompletedIn(days)
            }
        }
        (OrderStatus::Done | OrderStatus::Cancelled, _) => TimePassed::NotApplicable,
        _ => open_for((now - order.date).num_milliseconds()),
    }
}

fn open_for(span_ms: i64) -> TimePassed {
    if span_ms < 0 {
        return TimePassed::Days(0);
    }

    let days = span_ms / MS_PER_DAY;
    let hours = span_ms / MS_PER_HOUR;
    let minutes = span_ms / MS_PER_MINUTE;

    if days > 0 {
        TimePassed::Days(days)
    } else if hours > 0 {
        TimePassed::Hours(hours)
    } else if minutes > 0 {
        TimePassed::Minutes(minutes)
    } else {
        TimePassed::Now
    }
}
