use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BookingPaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    PartiallyRefunded,
}

impl BookingPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingPaymentStatus::Pending => "pending",
            BookingPaymentStatus::Paid => "paid",
            BookingPaymentStatus::Failed => "failed",
            BookingPaymentStatus::Refunded => "refunded",
            BookingPaymentStatus::PartiallyRefunded => "partially_refunded",
        }
    }
}

impl Display for BookingPaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingPaymentStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(BookingPaymentStatus::Pending),
            "paid" => Ok(BookingPaymentStatus::Paid),
            "failed" => Ok(BookingPaymentStatus::Failed),
            "refunded" => Ok(BookingPaymentStatus::Refunded),
            "partially_refunded" => Ok(BookingPaymentStatus::PartiallyRefunded),
            other => Err(anyhow!("unknown booking payment status: {}", other)),
        }
    }
}
