//! Shared query parameter types for API handlers.

use std::str::FromStr;

use rentfleet_core::error::CoreError;
use rentfleet_core::types::DbId;
use serde::Deserialize;

/// `?status=` filter for list endpoints.
///
/// Kept as a raw string so an unknown value produces the standard JSON
/// validation error instead of axum's plain-text query rejection.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    /// Parse the filter into a status enum. Blank values mean no filter.
    pub fn parse<T>(&self) -> Result<Option<T>, CoreError>
    where
        T: FromStr<Err = CoreError>,
    {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

/// `?machine_id=` filter for maintenance record listings.
#[derive(Debug, Deserialize)]
pub struct MachineFilter {
    pub machine_id: Option<DbId>,
}

#[cfg(test)]
mod tests {
    use rentfleet_core::status::BookingStatus;

    use super::*;

    #[test]
    fn blank_filter_is_none() {
        let filter = StatusFilter {
            status: Some("  ".into()),
        };
        assert_eq!(filter.parse::<BookingStatus>().unwrap(), None);
        assert_eq!(StatusFilter::default().parse::<BookingStatus>().unwrap(), None);
    }

    #[test]
    fn known_status_parses() {
        let filter = StatusFilter {
            status: Some("Pending".into()),
        };
        assert_eq!(
            filter.parse::<BookingStatus>().unwrap(),
            Some(BookingStatus::Pending)
        );
    }

    #[test]
    fn unknown_status_is_validation_error() {
        let filter = StatusFilter {
            status: Some("archived".into()),
        };
        assert!(matches!(
            filter.parse::<BookingStatus>(),
            Err(CoreError::Validation(_))
        ));
    }
}
