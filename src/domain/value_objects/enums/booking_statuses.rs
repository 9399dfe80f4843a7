use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::Rejected,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
            BookingStatus::NoShow => "no_show",
        }
    }

    /// Statuses reachable from `self` in a single update.
    pub fn next_statuses(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[
                BookingStatus::Confirmed,
                BookingStatus::Rejected,
                BookingStatus::Cancelled,
            ],
            BookingStatus::Confirmed => &[
                BookingStatus::Completed,
                BookingStatus::Cancelled,
                BookingStatus::NoShow,
            ],
            BookingStatus::Completed
            | BookingStatus::Cancelled
            | BookingStatus::Rejected
            | BookingStatus::NoShow => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }
}

/// Whether a booking may move from `from` to `to`. Staying in place is always
/// allowed and never produces a change log entry.
pub fn allowed(from: BookingStatus, to: BookingStatus) -> bool {
    from == to || from.next_statuses().contains(&to)
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "rejected" => Ok(BookingStatus::Rejected),
            "no_show" => Ok(BookingStatus::NoShow),
            other => Err(anyhow!("unknown booking status: {}", other)),
        }
    }
}
