use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// How a refund that exceeds the remaining balance of a payment is handled.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefundPolicy {
    /// Accept the refund as requested; the balance may go negative.
    #[default]
    Allow,
    /// Refuse any refund larger than the remaining balance.
    Reject,
    /// Shrink the refund to whatever balance remains.
    Cap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundDecision {
    Accept { amount_minor: i64 },
    Reject { remaining_minor: i64 },
}

impl RefundPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundPolicy::Allow => "allow",
            RefundPolicy::Reject => "reject",
            RefundPolicy::Cap => "cap",
        }
    }

    pub fn decide(
        &self,
        requested_minor: i64,
        paid_minor: i64,
        already_refunded_minor: i64,
    ) -> RefundDecision {
        let remaining_minor = paid_minor.saturating_sub(already_refunded_minor);

        // Whatever the policy, the running refund total must stay representable.
        if already_refunded_minor.checked_add(requested_minor).is_none() {
            return RefundDecision::Reject { remaining_minor };
        }

        match self {
            RefundPolicy::Allow => RefundDecision::Accept {
                amount_minor: requested_minor,
            },
            RefundPolicy::Reject if requested_minor > remaining_minor => {
                RefundDecision::Reject { remaining_minor }
            }
            RefundPolicy::Reject => RefundDecision::Accept {
                amount_minor: requested_minor,
            },
            RefundPolicy::Cap if remaining_minor <= 0 => RefundDecision::Reject { remaining_minor },
            RefundPolicy::Cap => RefundDecision::Accept {
                amount_minor: requested_minor.min(remaining_minor),
            },
        }
    }
}

impl Display for RefundPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefundPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(RefundPolicy::Allow),
            "reject" => Ok(RefundPolicy::Reject),
            "cap" => Ok(RefundPolicy::Cap),
            other => Err(anyhow!("unknown refund policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Payment of 85.00 with 20.00 already refunded, then a 70.00 request.
    const PAID: i64 = 8_500;
    const REFUNDED: i64 = 2_000;
    const REQUESTED: i64 = 7_000;

    #[test]
    fn allow_accepts_over_allocation() {
        assert_eq!(
            RefundPolicy::Allow.decide(REQUESTED, PAID, REFUNDED),
            RefundDecision::Accept { amount_minor: 7_000 }
        );
    }

    #[test]
    fn reject_refuses_over_allocation() {
        assert_eq!(
            RefundPolicy::Reject.decide(REQUESTED, PAID, REFUNDED),
            RefundDecision::Reject { remaining_minor: 6_500 }
        );
        assert_eq!(
            RefundPolicy::Reject.decide(6_500, PAID, REFUNDED),
            RefundDecision::Accept { amount_minor: 6_500 }
        );
    }

    #[test]
    fn cap_trims_to_remaining_balance() {
        assert_eq!(
            RefundPolicy::Cap.decide(REQUESTED, PAID, REFUNDED),
            RefundDecision::Accept { amount_minor: 6_500 }
        );
        assert_eq!(
            RefundPolicy::Cap.decide(1_000, PAID, REFUNDED),
            RefundDecision::Accept { amount_minor: 1_000 }
        );
    }

    #[test]
    fn allow_refuses_a_refund_that_overflows_the_running_total() {
        assert_eq!(
            RefundPolicy::Allow.decide(i64::MAX, PAID, REFUNDED),
            RefundDecision::Reject { remaining_minor: 6_500 }
        );
        assert_eq!(
            RefundPolicy::Allow.decide(i64::MAX - REFUNDED, PAID, REFUNDED),
            RefundDecision::Accept {
                amount_minor: i64::MAX - REFUNDED
            }
        );
    }

    #[test]
    fn cap_rejects_when_nothing_is_left() {
        assert_eq!(
            RefundPolicy::Cap.decide(100, PAID, PAID),
            RefundDecision::Reject { remaining_minor: 0 }
        );
    }

    #[test]
    fn parses_configuration_values() {
        assert_eq!(" Reject ".parse::<RefundPolicy>().unwrap(), RefundPolicy::Reject);
        assert_eq!("cap".parse::<RefundPolicy>().unwrap(), RefundPolicy::Cap);
        assert!("refuse".parse::<RefundPolicy>().is_err());
    }
}
