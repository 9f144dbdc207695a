// SPDX-License-Identifier: Apache-2.0

use crate::{normalize_location, ClaimStatus, ClaimType, ValidationError};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub const CLAIM_ID_MAX_LEN: usize = 64;
pub const NAME_MAX_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: i64,
    pub claim_id: String,
    pub applicant_name: String,
    pub father_name: Option<String>,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub claim_type: ClaimType,
    pub status: ClaimStatus,
    pub area_claimed: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub application_date: Option<String>,
    pub approval_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Claim submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewClaim {
    #[serde(default)]
    pub claim_id: Option<String>,
    pub applicant_name: String,
    #[serde(default)]
    pub father_name: Option<String>,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub claim_type: ClaimType,
    #[serde(default)]
    pub status: Option<ClaimStatus>,
    #[serde(default)]
    pub area_claimed: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub application_date: Option<String>,
}

impl NewClaim {
    /// Trims location keys and checks field bounds.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.applicant_name = required_text("applicant_name", &self.applicant_name)?;
        self.village_name = required_location("village_name", &self.village_name)?;
        self.district = required_location("district", &self.district)?;
        self.state = required_location("state", &self.state)?;
        self.father_name = optional_text(self.father_name.take());
        self.application_date = optional_text(self.application_date.take());

        if let Some(claim_id) = self.claim_id.take() {
            let claim_id = claim_id.trim().to_string();
            if !claim_id.is_empty() {
                validate_claim_id(&claim_id)?;
                self.claim_id = Some(claim_id);
            }
        }
        if let Some(area) = self.area_claimed {
            if !area.is_finite() || area < 0.0 {
                return Err(ValidationError::new(
                    "area_claimed",
                    "must be a non-negative number of hectares",
                ));
            }
        }
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ValidationError::new("latitude", "must be within -90..=90"));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ValidationError::new(
                    "longitude",
                    "must be within -180..=180",
                ));
            }
        }
        Ok(self)
    }
}

pub fn validate_claim_id(claim_id: &str) -> Result<(), ValidationError> {
    if claim_id.is_empty() {
        return Err(ValidationError::empty("claim_id"));
    }
    if claim_id.len() > CLAIM_ID_MAX_LEN {
        return Err(ValidationError::new(
            "claim_id",
            format!("exceeds max length {CLAIM_ID_MAX_LEN}"),
        ));
    }
    if !claim_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ValidationError::new(
            "claim_id",
            "must match [A-Za-z0-9_-]+",
        ));
    }
    Ok(())
}

fn required_text(field: &'static str, input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty(field));
    }
    if trimmed.len() > NAME_MAX_LEN {
        return Err(ValidationError::new(
            field,
            format!("exceeds max length {NAME_MAX_LEN}"),
        ));
    }
    Ok(trimmed.to_string())
}

fn required_location(field: &'static str, input: &str) -> Result<String, ValidationError> {
    required_text(field, input).map(|s| normalize_location(&s))
}

fn optional_text(input: Option<String>) -> Option<String> {
    input
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Two-letter upper-case prefix used in generated claim ids (`Odisha` -> `OD`).
#[must_use]
pub fn state_prefix(state: &str) -> String {
    let mut prefix: String = state
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(2)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while prefix.len() < 2 {
        prefix.push('X');
    }
    prefix
}

/// `FRA_<state prefix>_<unix millis>`.
#[must_use]
pub fn generate_claim_id(state: &str, millis: u128) -> String {
    format!("FRA_{}_{}", state_prefix(state), millis)
}

#[must_use]
pub fn generate_ticket_number(millis: u128) -> String {
    format!("TKT-{millis}")
}

#[must_use]
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NewClaim {
        NewClaim {
            claim_id: None,
            applicant_name: " Test User ".to_string(),
            father_name: Some("  ".to_string()),
            village_name: "  Jamguda   Village ".to_string(),
            district: "Kalahandi".to_string(),
            state: "Odisha".to_string(),
            claim_type: ClaimType::Ifr,
            status: None,
            area_claimed: Some(1.5),
            latitude: None,
            longitude: None,
            application_date: None,
        }
    }

    #[test]
    fn normalized_trims_and_collapses_location_keys() {
        let claim = base().normalized().expect("valid claim");
        assert_eq!(claim.applicant_name, "Test User");
        assert_eq!(claim.village_name, "Jamguda Village");
        assert_eq!(claim.father_name, None);
    }

    #[test]
    fn normalized_rejects_negative_area_and_bad_coordinates() {
        let mut c = base();
        c.area_claimed = Some(-0.1);
        assert_eq!(c.normalized().expect_err("area").field, "area_claimed");

        let mut c = base();
        c.latitude = Some(91.0);
        assert_eq!(c.normalized().expect_err("lat").field, "latitude");

        let mut c = base();
        c.state = "   ".to_string();
        assert_eq!(c.normalized().expect_err("state").field, "state");
    }

    #[test]
    fn explicit_claim_id_is_charset_checked() {
        let mut c = base();
        c.claim_id = Some("FRA OD 1".to_string());
        assert_eq!(c.normalized().expect_err("claim id").field, "claim_id");

        let mut c = base();
        c.claim_id = Some("  ".to_string());
        assert_eq!(c.normalized().expect("blank id ignored").claim_id, None);
    }

    #[test]
    fn generated_claim_id_uses_two_letter_state_prefix() {
        assert_eq!(generate_claim_id("Odisha", 1_700_000_000_000), "FRA_OD_1700000000000");
        assert_eq!(state_prefix("madhya pradesh"), "MA");
        assert_eq!(state_prefix("X"), "XX");
        assert_eq!(generate_ticket_number(42), "TKT-42");
    }
}
