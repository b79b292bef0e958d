//! Customer status filter and ODP filter selection

use crate::error::NetMapError;
use crate::map::Marker;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Which customers to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Customers whose status is `active`
    Online,
    /// Everyone else, including unknown status
    Offline,
}

impl StatusFilter {
    /// Whether a customer marker passes the filter
    pub fn admits(&self, marker: &Marker) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Online => marker.is_active(),
            StatusFilter::Offline => !marker.is_active(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Online => "online",
            StatusFilter::Offline => "offline",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = NetMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "online" => Ok(StatusFilter::Online),
            "offline" => Ok(StatusFilter::Offline),
            other => Err(NetMapError::invalid_input(format!(
                "Unknown status filter '{other}'. Use 'all', 'online' or 'offline'"
            ))),
        }
    }
}

/// Value of the "all ODP" option
pub const ALL_ODP: &str = "all";

/// Current value of the ODP filter select
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OdpSelection {
    #[default]
    All,
    Odp(String),
}

impl OdpSelection {
    /// Parse a select value; empty and `all` mean no filter
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_ODP {
            OdpSelection::All
        } else {
            OdpSelection::Odp(value.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            OdpSelection::All => ALL_ODP,
            OdpSelection::Odp(id) => id,
        }
    }

    /// Keep the selection only if it is still one of `ids`
    pub fn reconcile<'a, I>(&self, mut ids: I) -> Self
    where
        I: Iterator<Item = &'a str>,
    {
        if let OdpSelection::Odp(id) = self {
            if ids.any(|candidate| candidate == id.as_str()) {
                return self.clone();
            }
        }
        OdpSelection::All
    }
}

impl Serialize for OdpSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("all", StatusFilter::All)]
    #[case("online", StatusFilter::Online)]
    #[case(" Offline ", StatusFilter::Offline)]
    fn test_parse_status_filter(#[case] input: &str, #[case] expected: StatusFilter) {
        assert_eq!(input.parse::<StatusFilter>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_status_filter() {
        let err = "suspended".parse::<StatusFilter>().unwrap_err();
        assert!(matches!(err, NetMapError::InvalidInput(_)));
    }

    #[test]
    fn test_reconcile_selection() {
        let selected = OdpSelection::from_value("12");
        let ids = ["3", "12", "40"];

        assert_eq!(selected.reconcile(ids.iter().copied()), selected);
        assert_eq!(
            selected.reconcile(["3", "40"].iter().copied()),
            OdpSelection::All
        );
        assert_eq!(
            OdpSelection::All.reconcile(ids.iter().copied()),
            OdpSelection::All
        );
        assert_eq!(OdpSelection::from_value("all"), OdpSelection::All);
    }
}
