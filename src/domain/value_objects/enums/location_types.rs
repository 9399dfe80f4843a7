use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    InPerson,
    Online,
    #[default]
    Both,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::InPerson => "in_person",
            LocationType::Online => "online",
            LocationType::Both => "both",
        }
    }

    /// Concrete location for a booking against a service offered as `self`.
    /// `None` when the service does not offer the requested location.
    pub fn resolve_for_booking(&self, requested: Option<LocationType>) -> Option<LocationType> {
        match (self, requested) {
            (_, Some(LocationType::Both)) => None,
            (LocationType::Both, None) => Some(LocationType::InPerson),
            (LocationType::Both, Some(requested)) => Some(requested),
            (offered, None) => Some(*offered),
            (offered, Some(requested)) if *offered == requested => Some(requested),
            _ => None,
        }
    }
}

impl Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "in_person" => Ok(LocationType::InPerson),
            "online" => Ok(LocationType::Online),
            "both" => Ok(LocationType::Both),
            other => Err(anyhow!("unknown location type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_defaults_to_in_person() {
        assert_eq!(
            LocationType::Both.resolve_for_booking(None),
            Some(LocationType::InPerson)
        );
        assert_eq!(
            LocationType::Both.resolve_for_booking(Some(LocationType::Online)),
            Some(LocationType::Online)
        );
    }

    #[test]
    fn single_location_services_only_accept_their_own() {
        assert_eq!(
            LocationType::Online.resolve_for_booking(None),
            Some(LocationType::Online)
        );
        assert_eq!(
            LocationType::Online.resolve_for_booking(Some(LocationType::InPerson)),
            None
        );
        assert_eq!(
            LocationType::InPerson.resolve_for_booking(Some(LocationType::Both)),
            None
        );
    }
}
