//! Status enums mapping to SMALLSERIAL lookup tables.
//!
//! Each variant's discriminant matches the seed data order (1-based) in the
//! corresponding `*_statuses` table. Every variant also carries a wire name
//! (used in JSON and query strings) and a human-readable label for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Wire name used in JSON payloads and query strings.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }

            /// Display label shown to users.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = CoreError;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                $name::from_id(id).ok_or_else(|| {
                    CoreError::Internal(format!("Unknown {} id {id}", stringify!($name)))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let valid: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        CoreError::Validation(format!(
                            "Invalid {} '{s}'. Must be one of: {}",
                            stringify!($name),
                            valid.join(", ")
                        ))
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_status_enum! {
    /// Machine operational status.
    MachineStatus {
        Available = 1 => ("available", "Available"),
        Booked = 2 => ("booked", "Booked"),
        InUse = 3 => ("in_use", "In Use"),
        Maintenance = 4 => ("maintenance", "Maintenance"),
        OutOfService = 5 => ("out_of_service", "Out of Service"),
    }
}

define_status_enum! {
    /// Booking lifecycle status.
    BookingStatus {
        Pending = 1 => ("pending", "Pending Approval"),
        Confirmed = 2 => ("confirmed", "Confirmed"),
        InProgress = 3 => ("in_progress", "In Progress"),
        Completed = 4 => ("completed", "Completed"),
        Cancelled = 5 => ("cancelled", "Cancelled"),
    }
}

define_status_enum! {
    /// Support ticket status.
    TicketStatus {
        Open = 1 => ("open", "Open"),
        InProgress = 2 => ("in_progress", "In Progress"),
        Solved = 3 => ("solved", "Solved"),
        Closed = 4 => ("closed", "Closed"),
    }
}

define_status_enum! {
    /// Support ticket category.
    TicketCategory {
        Payment = 1 => ("payment", "Payment Issues"),
        Booking = 2 => ("booking", "Booking Issues"),
    }
}

define_status_enum! {
    /// Payment slip review status.
    PaymentSlipStatus {
        Uploaded = 1 => ("uploaded", "Uploaded"),
        Pending = 2 => ("pending", "Pending Review"),
        Verified = 3 => ("verified", "Verified"),
        Rejected = 4 => ("rejected", "Rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_status_ids_match_seed_data() {
        assert_eq!(MachineStatus::Available.id(), 1);
        assert_eq!(MachineStatus::Booked.id(), 2);
        assert_eq!(MachineStatus::InUse.id(), 3);
        assert_eq!(MachineStatus::Maintenance.id(), 4);
        assert_eq!(MachineStatus::OutOfService.id(), 5);
    }

    #[test]
    fn booking_status_ids_match_seed_data() {
        assert_eq!(BookingStatus::Pending.id(), 1);
        assert_eq!(BookingStatus::Cancelled.id(), 5);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = TicketStatus::Solved.into();
        assert_eq!(id, 3);
    }

    #[test]
    fn from_id_rejects_unknown_values() {
        assert_eq!(PaymentSlipStatus::from_id(4), Some(PaymentSlipStatus::Rejected));
        assert_eq!(PaymentSlipStatus::from_id(0), None);
        assert_eq!(PaymentSlipStatus::from_id(9), None);
        assert!(TicketCategory::try_from(3).is_err());
        assert_eq!(TicketCategory::try_from(2).unwrap(), TicketCategory::Booking);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("IN_USE".parse::<MachineStatus>().unwrap(), MachineStatus::InUse);
        assert_eq!(" confirmed ".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
    }

    #[test]
    fn parse_unknown_lists_valid_values() {
        let err = "archived".parse::<TicketStatus>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid TicketStatus 'archived'"));
        assert!(msg.contains("open, in_progress, solved, closed"));
    }

    #[test]
    fn labels_are_display_strings() {
        assert_eq!(BookingStatus::Pending.label(), "Pending Approval");
        assert_eq!(TicketCategory::Payment.label(), "Payment Issues");
        assert_eq!(MachineStatus::OutOfService.label(), "Out of Service");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&BookingStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let parsed: MachineStatus = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(parsed, MachineStatus::Maintenance);

        assert!(serde_json::from_str::<MachineStatus>("\"broken\"").is_err());
    }
}
