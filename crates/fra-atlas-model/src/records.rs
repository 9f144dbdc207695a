// SPDX-License-Identifier: Apache-2.0

use crate::{
    AssetType, DemarcationStatus, DocumentStatus, TicketPriority, TicketStatus, ValidationError,
    VerificationStatus, NAME_MAX_LEN,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GEOMETRY_TYPES: [&str; 6] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PattaHolder {
    pub id: i64,
    pub patta_number: String,
    pub claim_id: String,
    pub holder_name: String,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub caste_category: Option<String>,
    pub family_members: Option<i64>,
    pub land_area: f64,
    pub land_use: Option<String>,
    pub verification_status: VerificationStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub issue_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandParcel {
    pub id: i64,
    pub parcel_id: String,
    pub claim_id: String,
    pub survey_number: Option<String>,
    pub khasra_number: Option<String>,
    pub land_classification: Option<String>,
    pub area_hectares: f64,
    pub soil_type: Option<String>,
    pub irrigation_source: Option<String>,
    pub demarcation_status: DemarcationStatus,
    /// Loosely typed: parsed JSON when the stored text is JSON, otherwise the raw string.
    pub boundary_coordinates: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Village {
    pub id: i64,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub population: i64,
    pub tribal_population: i64,
    pub total_area_hectares: f64,
    pub forest_area_hectares: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageAsset {
    pub id: i64,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub asset_type: AssetType,
    pub area_hectares: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub confidence_score: f64,
    pub detection_method: Option<String>,
    pub detected_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VillageBoundary {
    pub id: i64,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub area_sqkm: f64,
    pub geometry: Value,
}

impl VillageBoundary {
    /// Accepts a GeoJSON geometry object (`type` + `coordinates`).
    pub fn validate_geometry(geometry: &Value) -> Result<(), ValidationError> {
        let kind = geometry
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::new("geometry", "missing string `type`"))?;
        if !GEOMETRY_TYPES.contains(&kind) {
            return Err(ValidationError::new(
                "geometry",
                format!("unsupported geometry type {kind:?}"),
            ));
        }
        if !geometry.get("coordinates").is_some_and(Value::is_array) {
            return Err(ValidationError::new(
                "geometry",
                "`coordinates` must be an array",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: i64,
    pub scheme_name: String,
    pub ministry: Option<String>,
    pub description: Option<String>,
    pub eligibility_criteria: Value,
    pub benefits: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub document_name: String,
    pub document_type: String,
    pub claim_id: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub status: DocumentStatus,
    pub uploaded_by: Option<String>,
    pub uploaded_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDocument {
    pub document_name: String,
    pub document_type: String,
    #[serde(default)]
    pub claim_id: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl NewDocument {
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.document_name = bounded_text("document_name", &self.document_name)?;
        self.document_type = bounded_text("document_type", &self.document_type)?;
        if self.file_size.is_some_and(|size| size < 0) {
            return Err(ValidationError::new("file_size", "must be >= 0"));
        }
        self.claim_id = self
            .claim_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentUpdate {
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub status: Option<DocumentStatus>,
}

impl DocumentUpdate {
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        if self.document_name.is_none() && self.document_type.is_none() && self.status.is_none()
        {
            return Err(ValidationError::new("body", "no updatable field supplied"));
        }
        if let Some(name) = self.document_name.take() {
            self.document_name = Some(bounded_text("document_name", &name)?);
        }
        if let Some(kind) = self.document_type.take() {
            self.document_type = Some(bounded_text("document_type", &kind)?);
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: i64,
    pub ticket_number: String,
    pub subject: String,
    pub description: String,
    pub category: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub submitted_by: Option<String>,
    pub email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSupportTicket {
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl NewSupportTicket {
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.subject = bounded_text("subject", &self.subject)?;
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::empty("description"));
        }
        self.description = description.to_string();
        if let Some(email) = &self.email {
            let email = email.trim();
            if !email.is_empty() && !email.contains('@') {
                return Err(ValidationError::new("email", "must contain '@'"));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketUpdate {
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TicketUpdate {
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        if self.status.is_none() && self.priority.is_none() && self.category.is_none() {
            return Err(ValidationError::new("body", "no updatable field supplied"));
        }
        if let Some(category) = self.category.take() {
            self.category = Some(bounded_text("category", &category)?);
        }
        Ok(self)
    }
}

fn bounded_text(field: &'static str, input: &str) -> Result<String, ValidationError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn geometry_validation_requires_known_type_and_coordinates() {
        let polygon = json!({"type": "Polygon", "coordinates": [[[83.1, 19.9], [83.2, 19.9], [83.2, 20.0], [83.1, 19.9]]]});
        assert!(VillageBoundary::validate_geometry(&polygon).is_ok());
        assert!(VillageBoundary::validate_geometry(&json!({"type": "Circle", "coordinates": []})).is_err());
        assert!(VillageBoundary::validate_geometry(&json!({"type": "Polygon"})).is_err());
        assert!(VillageBoundary::validate_geometry(&json!("Polygon")).is_err());
    }

    #[test]
    fn empty_updates_are_rejected() {
        assert!(DocumentUpdate::default().normalized().is_err());
        assert!(TicketUpdate::default().normalized().is_err());
        let update = TicketUpdate {
            status: Some(TicketStatus::Resolved),
            ..TicketUpdate::default()
        };
        assert!(update.normalized().is_ok());
    }

    #[test]
    fn new_ticket_requires_subject_and_plausible_email() {
        let ticket = NewSupportTicket {
            subject: " Map not loading ".to_string(),
            description: "Boundary layer is blank".to_string(),
            category: None,
            priority: None,
            submitted_by: None,
            email: Some("officer.example.org".to_string()),
        };
        assert_eq!(ticket.clone().normalized().expect_err("email").field, "email");
        let ok = NewSupportTicket {
            email: None,
            ..ticket
        }
        .normalized()
        .expect("valid");
        assert_eq!(ok.subject, "Map not loading");
    }
}
