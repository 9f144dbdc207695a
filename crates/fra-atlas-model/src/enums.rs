// SPDX-License-Identifier: Apache-2.0

use crate::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Declares a closed string enumeration stored verbatim in the database.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn parse(input: &str) -> Result<Self, ValidationError> {
                match input.trim() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ValidationError::new(
                        $field,
                        format!(
                            "unknown value {other:?}; expected one of {}",
                            [$($text),+].join(", ")
                        ),
                    )),
                }
            }

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Quoted value list for a SQL `CHECK (col IN (...))` constraint.
            #[must_use]
            pub fn sql_value_list() -> String {
                [$(concat!("'", $text, "'")),+].join(", ")
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
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
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum!(
    /// Individual, community, or community forest resource rights.
    ClaimType, "claim_type", {
        Ifr => "IFR",
        Cr => "CR",
        Cfr => "CFR",
    }
);

string_enum!(
    ClaimStatus, "status", {
        Pending => "pending",
        Granted => "granted",
        Rejected => "rejected",
        UnderReview => "under_review",
    }
);

string_enum!(
    VerificationStatus, "verification_status", {
        Verified => "Verified",
        Pending => "Pending",
        Rejected => "Rejected",
    }
);

string_enum!(
    DemarcationStatus, "demarcation_status", {
        Completed => "Completed",
        Pending => "Pending",
        Disputed => "Disputed",
    }
);

string_enum!(
    AssetType, "asset_type", {
        WaterBody => "water_body",
        Forest => "forest",
        AgriculturalLand => "agricultural_land",
        Homestead => "homestead",
    }
);

string_enum!(
    DocumentStatus, "status", {
        Uploaded => "uploaded",
        Processing => "processing",
        Processed => "processed",
        Failed => "failed",
    }
);

string_enum!(
    TicketPriority, "priority", {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
);

string_enum!(
    TicketStatus, "status", {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_enums_parse_exact_wire_values() {
        assert_eq!(ClaimType::parse("CFR").expect("cfr"), ClaimType::Cfr);
        assert_eq!(
            ClaimStatus::parse(" under_review ").expect("trimmed"),
            ClaimStatus::UnderReview
        );
        let err = ClaimStatus::parse("approved").expect_err("unknown status");
        assert_eq!(err.field, "status");
        assert!(err.reason.contains("pending"));
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&AssetType::WaterBody).expect("serialize");
        assert_eq!(json, "\"water_body\"");
        let parsed: TicketPriority = serde_json::from_str("\"critical\"").expect("deserialize");
        assert_eq!(parsed, TicketPriority::Critical);
        assert!(serde_json::from_str::<ClaimType>("\"ifr\"").is_err());
    }

    #[test]
    fn sql_value_list_quotes_every_value() {
        assert_eq!(ClaimType::sql_value_list(), "'IFR', 'CR', 'CFR'");
    }
}
