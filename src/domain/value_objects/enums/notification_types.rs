use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    BookingConfirmed,
    BookingCancelled,
    BookingReminder,
    NewMessage,
    NewReview,
    Promotion,
    SystemAlert,
    PaymentConfirmed,
    PaymentFailed,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::BookingConfirmed => "booking_confirmed",
            NotificationType::BookingCancelled => "booking_cancelled",
            NotificationType::BookingReminder => "booking_reminder",
            NotificationType::NewMessage => "new_message",
            NotificationType::NewReview => "new_review",
            NotificationType::Promotion => "promotion",
            NotificationType::SystemAlert => "system_alert",
            NotificationType::PaymentConfirmed => "payment_confirmed",
            NotificationType::PaymentFailed => "payment_failed",
        }
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "booking_confirmed" => Ok(NotificationType::BookingConfirmed),
            "booking_cancelled" => Ok(NotificationType::BookingCancelled),
            "booking_reminder" => Ok(NotificationType::BookingReminder),
            "new_message" => Ok(NotificationType::NewMessage),
            "new_review" => Ok(NotificationType::NewReview),
            "promotion" => Ok(NotificationType::Promotion),
            "system_alert" => Ok(NotificationType::SystemAlert),
            "payment_confirmed" => Ok(NotificationType::PaymentConfirmed),
            "payment_failed" => Ok(NotificationType::PaymentFailed),
            other => Err(anyhow!("unknown notification type: {}", other)),
        }
    }
}
