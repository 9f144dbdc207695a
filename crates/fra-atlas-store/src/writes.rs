// SPDX-License-Identifier: Apache-2.0

use crate::rows::{fetch_claim, fetch_document, fetch_ticket};
use crate::{StoreError, SQL_NOW};
use fra_atlas_model::{
    generate_claim_id, generate_ticket_number, normalize_location, AssetType, Claim, ClaimStatus,
    DemarcationStatus, Document, DocumentStatus, DocumentUpdate, NewClaim, NewDocument,
    NewSupportTicket, SupportTicket, TicketPriority, TicketUpdate, ValidationError,
    VerificationStatus, VillageBoundary,
};
use rusqlite::{params, Connection};
use serde_json::Value;

fn missing(what: &str, key: impl std::fmt::Display) -> StoreError {
    StoreError::NotFound(format!("{what} {key} not found"))
}

/// Inserts a claim, generating `FRA_<prefix>_<millis>` when no id is supplied.
pub fn insert_claim(conn: &Connection, claim: NewClaim, millis: u128) -> Result<Claim, StoreError> {
    let claim = claim.normalized()?;
    let claim_id = claim
        .claim_id
        .clone()
        .unwrap_or_else(|| generate_claim_id(&claim.state, millis));
    let status = claim.status.unwrap_or(ClaimStatus::Pending);
    conn.execute(
        &format!(
            "INSERT INTO claims (claim_id, applicant_name, father_name, village_name, district,
               state, claim_type, status, area_claimed, latitude, longitude, application_date,
               approval_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, COALESCE(?12, date('now')),
               CASE WHEN ?8 = 'granted' THEN date('now') END, {SQL_NOW}, {SQL_NOW})"
        ),
        params![
            claim_id,
            claim.applicant_name,
            claim.father_name,
            claim.village_name,
            claim.district,
            claim.state,
            claim.claim_type.as_str(),
            status.as_str(),
            claim.area_claimed.unwrap_or(0.0),
            claim.latitude,
            claim.longitude,
            claim.application_date,
        ],
    )
    .map_err(|e| StoreError::from_insert(e, || format!("claim_id {claim_id} already exists")))?;
    fetch_claim(conn, &claim_id)?.ok_or_else(|| missing("claim", &claim_id))
}

/// Sets any valid status. Granting stamps `approval_date` once.
pub fn update_claim_status(
    conn: &Connection,
    claim_id: &str,
    status: ClaimStatus,
) -> Result<Claim, StoreError> {
    let changed = conn.execute(
        &format!(
            "UPDATE claims
             SET status = ?2,
                 updated_at = {SQL_NOW},
                 approval_date = CASE
                   WHEN ?2 = 'granted' AND approval_date IS NULL THEN date('now')
                   ELSE approval_date
                 END
             WHERE claim_id = ?1"
        ),
        params![claim_id, status.as_str()],
    )?;
    if changed == 0 {
        return Err(missing("claim", claim_id));
    }
    fetch_claim(conn, claim_id)?.ok_or_else(|| missing("claim", claim_id))
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPattaHolder {
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

pub fn insert_patta_holder(conn: &Connection, holder: &NewPattaHolder) -> Result<i64, StoreError> {
    if holder.patta_number.trim().is_empty() {
        return Err(ValidationError::empty("patta_number").into());
    }
    if fetch_claim(conn, &holder.claim_id)?.is_none() {
        return Err(missing("claim", &holder.claim_id));
    }
    conn.execute(
        "INSERT INTO patta_holders (patta_number, claim_id, holder_name, father_name, gender, age,
           caste_category, family_members, land_area, land_use, verification_status, latitude,
           longitude, issue_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            holder.patta_number.trim(),
            holder.claim_id,
            holder.holder_name,
            holder.father_name,
            holder.gender,
            holder.age,
            holder.caste_category,
            holder.family_members,
            holder.land_area,
            holder.land_use,
            holder.verification_status.as_str(),
            holder.latitude,
            holder.longitude,
            holder.issue_date,
        ],
    )
    .map_err(|e| {
        StoreError::from_insert(e, || {
            format!("patta_number {} already exists", holder.patta_number.trim())
        })
    })?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLandParcel {
    pub parcel_id: String,
    pub claim_id: String,
    pub survey_number: Option<String>,
    pub khasra_number: Option<String>,
    pub land_classification: Option<String>,
    pub area_hectares: f64,
    pub soil_type: Option<String>,
    pub irrigation_source: Option<String>,
    pub demarcation_status: DemarcationStatus,
    pub boundary_coordinates: Option<Value>,
}

pub fn insert_land_parcel(conn: &Connection, parcel: &NewLandParcel) -> Result<i64, StoreError> {
    if fetch_claim(conn, &parcel.claim_id)?.is_none() {
        return Err(missing("claim", &parcel.claim_id));
    }
    let coordinates = parcel.boundary_coordinates.as_ref().map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });
    conn.execute(
        "INSERT INTO land_parcels (parcel_id, claim_id, survey_number, khasra_number,
           land_classification, area_hectares, soil_type, irrigation_source, demarcation_status,
           boundary_coordinates)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            parcel.parcel_id,
            parcel.claim_id,
            parcel.survey_number,
            parcel.khasra_number,
            parcel.land_classification,
            parcel.area_hectares,
            parcel.soil_type,
            parcel.irrigation_source,
            parcel.demarcation_status.as_str(),
            coordinates,
        ],
    )
    .map_err(|e| {
        StoreError::from_insert(e, || format!("parcel_id {} already exists", parcel.parcel_id))
    })?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVillage {
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

pub fn insert_village(conn: &Connection, village: &NewVillage) -> Result<i64, StoreError> {
    if village.tribal_population > village.population {
        return Err(ValidationError::new("tribal_population", "exceeds population").into());
    }
    let name = normalize_location(&village.village_name);
    conn.execute(
        "INSERT INTO villages (village_name, district, state, population, tribal_population,
           total_area_hectares, forest_area_hectares, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            name,
            normalize_location(&village.district),
            normalize_location(&village.state),
            village.population,
            village.tribal_population,
            village.total_area_hectares,
            village.forest_area_hectares,
            village.latitude,
            village.longitude,
        ],
    )
    .map_err(|e| StoreError::from_insert(e, || format!("village {name} already exists")))?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub asset_type: AssetType,
    pub area_hectares: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub confidence_score: f64,
    pub detection_method: Option<String>,
}

pub fn insert_asset(conn: &Connection, asset: &NewAsset) -> Result<i64, StoreError> {
    if !(0.0..=1.0).contains(&asset.confidence_score) {
        return Err(ValidationError::new("confidence_score", "must be within 0..=1").into());
    }
    conn.execute(
        &format!(
            "INSERT INTO village_assets (village_name, district, state, asset_type, area_hectares,
               latitude, longitude, confidence_score, detection_method, detected_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, {SQL_NOW})"
        ),
        params![
            normalize_location(&asset.village_name),
            normalize_location(&asset.district),
            normalize_location(&asset.state),
            asset.asset_type.as_str(),
            asset.area_hectares,
            asset.latitude,
            asset.longitude,
            asset.confidence_score,
            asset.detection_method,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBoundary {
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub area_sqkm: f64,
    pub geometry: Value,
}

/// Geometry is validated before it is stored so exports never meet bad JSON.
pub fn insert_boundary(conn: &Connection, boundary: &NewBoundary) -> Result<i64, StoreError> {
    VillageBoundary::validate_geometry(&boundary.geometry)?;
    let name = normalize_location(&boundary.village_name);
    conn.execute(
        "INSERT INTO village_boundaries (village_name, district, state, area_sqkm, geometry)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            normalize_location(&boundary.district),
            normalize_location(&boundary.state),
            boundary.area_sqkm,
            boundary.geometry.to_string(),
        ],
    )
    .map_err(|e| StoreError::from_insert(e, || format!("boundary for {name} already exists")))?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScheme {
    pub scheme_name: String,
    pub ministry: Option<String>,
    pub description: Option<String>,
    pub eligibility_criteria: Value,
    pub benefits: Option<String>,
    pub is_active: bool,
}

pub fn insert_scheme(conn: &Connection, scheme: &NewScheme) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO schemes (scheme_name, ministry, description, eligibility_criteria, benefits,
           is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            scheme.scheme_name,
            scheme.ministry,
            scheme.description,
            scheme.eligibility_criteria.to_string(),
            scheme.benefits,
            scheme.is_active,
        ],
    )
    .map_err(|e| {
        StoreError::from_insert(e, || format!("scheme {} already exists", scheme.scheme_name))
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_document(conn: &Connection, document: NewDocument) -> Result<Document, StoreError> {
    let document = document.normalized()?;
    conn.execute(
        &format!(
            "INSERT INTO documents (document_name, document_type, claim_id, file_path, file_size,
               status, uploaded_by, uploaded_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, {SQL_NOW}, {SQL_NOW})"
        ),
        params![
            document.document_name,
            document.document_type,
            document.claim_id,
            document.file_path,
            document.file_size,
            document.status.unwrap_or(DocumentStatus::Uploaded).as_str(),
            document.uploaded_by,
        ],
    )?;
    let id = conn.last_insert_rowid();
    fetch_document(conn, id)?.ok_or_else(|| missing("document", id))
}

pub fn update_document(
    conn: &Connection,
    id: i64,
    update: DocumentUpdate,
) -> Result<Document, StoreError> {
    let update = update.normalized()?;
    let changed = conn.execute(
        &format!(
            "UPDATE documents
             SET document_name = COALESCE(?2, document_name),
                 document_type = COALESCE(?3, document_type),
                 status = COALESCE(?4, status),
                 updated_at = {SQL_NOW}
             WHERE id = ?1"
        ),
        params![
            id,
            update.document_name,
            update.document_type,
            update.status.map(DocumentStatus::as_str),
        ],
    )?;
    if changed == 0 {
        return Err(missing("document", id));
    }
    fetch_document(conn, id)?.ok_or_else(|| missing("document", id))
}

pub fn delete_document(conn: &Connection, id: i64) -> Result<(), StoreError> {
    if conn.execute("DELETE FROM documents WHERE id = ?1", params![id])? == 0 {
        return Err(missing("document", id));
    }
    Ok(())
}

/// Inserts a ticket numbered `TKT-<millis>`.
pub fn insert_ticket(
    conn: &Connection,
    ticket: NewSupportTicket,
    millis: u128,
) -> Result<SupportTicket, StoreError> {
    let ticket = ticket.normalized()?;
    let ticket_number = generate_ticket_number(millis);
    conn.execute(
        &format!(
            "INSERT INTO support_tickets (ticket_number, subject, description, category, priority,
               status, submitted_by, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'open', ?6, ?7, {SQL_NOW}, {SQL_NOW})"
        ),
        params![
            ticket_number,
            ticket.subject,
            ticket.description,
            ticket
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or("general"),
            ticket.priority.unwrap_or(TicketPriority::Medium).as_str(),
            ticket.submitted_by,
            ticket.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
        ],
    )
    .map_err(|e| {
        StoreError::from_insert(e, || format!("ticket_number {ticket_number} already exists"))
    })?;
    let id = conn.last_insert_rowid();
    fetch_ticket(conn, id)?.ok_or_else(|| missing("ticket", id))
}

pub fn update_ticket(
    conn: &Connection,
    id: i64,
    update: TicketUpdate,
) -> Result<SupportTicket, StoreError> {
    let update = update.normalized()?;
    let changed = conn.execute(
        &format!(
            "UPDATE support_tickets
             SET status = COALESCE(?2, status),
                 priority = COALESCE(?3, priority),
                 category = COALESCE(?4, category),
                 updated_at = {SQL_NOW}
             WHERE id = ?1"
        ),
        params![
            id,
            update.status.map(|s| s.as_str()),
            update.priority.map(|p| p.as_str()),
            update.category,
        ],
    )?;
    if changed == 0 {
        return Err(missing("ticket", id));
    }
    fetch_ticket(conn, id)?.ok_or_else(|| missing("ticket", id))
}

pub fn delete_ticket(conn: &Connection, id: i64) -> Result<(), StoreError> {
    if conn.execute("DELETE FROM support_tickets WHERE id = ?1", params![id])? == 0 {
        return Err(missing("ticket", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use fra_atlas_model::{ClaimType, TicketStatus};
    use serde_json::json;

    fn conn() -> Connection {
        let mut conn = Connection::open_in_memory().expect("memory db");
        conn.execute_batch("PRAGMA foreign_keys=ON;").expect("fk");
        migrate(&mut conn).expect("migrate");
        conn
    }

    fn claim(state: &str) -> NewClaim {
        NewClaim {
            claim_id: None,
            applicant_name: "Test User".to_string(),
            father_name: None,
            village_name: "Jamguda".to_string(),
            district: "Kalahandi".to_string(),
            state: state.to_string(),
            claim_type: ClaimType::Ifr,
            status: None,
            area_claimed: Some(1.5),
            latitude: None,
            longitude: None,
            application_date: None,
        }
    }

    #[test]
    fn insert_claim_generates_id_and_defaults_status() {
        let conn = conn();
        let stored = insert_claim(&conn, claim("Odisha"), 1_700_000_000_123).expect("insert");
        assert_eq!(stored.claim_id, "FRA_OD_1700000000123");
        assert_eq!(stored.status, ClaimStatus::Pending);
        assert_eq!(stored.area_claimed, 1.5);
        assert!(stored.application_date.is_some());
        assert!(stored.approval_date.is_none());
    }

    #[test]
    fn duplicate_claim_id_is_a_conflict() {
        let conn = conn();
        insert_claim(&conn, claim("Odisha"), 7).expect("first");
        let err = insert_claim(&conn, claim("Odisha"), 7).expect_err("second");
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn status_update_accepts_any_transition_and_stamps_approval_once() {
        let conn = conn();
        let c = insert_claim(&conn, claim("Odisha"), 9).expect("insert");
        let granted = update_claim_status(&conn, &c.claim_id, ClaimStatus::Granted).expect("grant");
        let approval = granted.approval_date.clone();
        assert!(approval.is_some());
        let back = update_claim_status(&conn, &c.claim_id, ClaimStatus::Pending).expect("revert");
        assert_eq!(back.status, ClaimStatus::Pending);
        let again = update_claim_status(&conn, &c.claim_id, ClaimStatus::Granted).expect("regrant");
        assert_eq!(again.approval_date, approval);

        let err = update_claim_status(&conn, "FRA_XX_0", ClaimStatus::Granted).expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn patta_holders_require_existing_claim_and_unique_number() {
        let conn = conn();
        let c = insert_claim(&conn, claim("Odisha"), 11).expect("insert");
        let holder = NewPattaHolder {
            patta_number: "PT-1".to_string(),
            claim_id: c.claim_id.clone(),
            holder_name: "Test User".to_string(),
            father_name: None,
            gender: None,
            age: Some(40),
            caste_category: None,
            family_members: Some(4),
            land_area: 1.5,
            land_use: None,
            verification_status: VerificationStatus::Verified,
            latitude: Some(19.9),
            longitude: Some(83.1),
            issue_date: None,
        };
        insert_patta_holder(&conn, &holder).expect("holder");
        assert!(matches!(
            insert_patta_holder(&conn, &holder),
            Err(StoreError::Conflict(_))
        ));
        let orphan = NewPattaHolder {
            patta_number: "PT-2".to_string(),
            claim_id: "FRA_NO_1".to_string(),
            ..holder
        };
        assert!(matches!(
            insert_patta_holder(&conn, &orphan),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn boundary_geometry_is_validated_on_write() {
        let conn = conn();
        let bad = NewBoundary {
            village_name: "Jamguda".to_string(),
            district: "Kalahandi".to_string(),
            state: "Odisha".to_string(),
            area_sqkm: 2.0,
            geometry: json!({"type": "Polygon"}),
        };
        assert!(matches!(
            insert_boundary(&conn, &bad),
            Err(StoreError::Validation(_))
        ));
        let good = NewBoundary {
            geometry: json!({"type": "Polygon", "coordinates": [[[83.1, 19.9], [83.2, 19.9], [83.1, 19.9]]]}),
            ..bad
        };
        insert_boundary(&conn, &good).expect("valid boundary");
    }

    #[test]
    fn documents_and_tickets_support_update_and_delete() {
        let conn = conn();
        let doc = insert_document(
            &conn,
            NewDocument {
                document_name: "survey.pdf".to_string(),
                document_type: "survey".to_string(),
                claim_id: None,
                file_path: None,
                file_size: Some(1024),
                status: None,
                uploaded_by: None,
            },
        )
        .expect("document");
        assert_eq!(doc.status, DocumentStatus::Uploaded);
        let updated = update_document(
            &conn,
            doc.id,
            DocumentUpdate {
                status: Some(DocumentStatus::Processed),
                ..DocumentUpdate::default()
            },
        )
        .expect("update");
        assert_eq!(updated.status, DocumentStatus::Processed);
        assert_eq!(updated.document_name, "survey.pdf");
        delete_document(&conn, doc.id).expect("delete");
        assert!(matches!(
            delete_document(&conn, doc.id),
            Err(StoreError::NotFound(_))
        ));

        let ticket = insert_ticket(
            &conn,
            NewSupportTicket {
                subject: "Map blank".to_string(),
                description: "No boundaries".to_string(),
                category: None,
                priority: None,
                submitted_by: None,
                email: None,
            },
            42,
        )
        .expect("ticket");
        assert_eq!(ticket.ticket_number, "TKT-42");
        assert_eq!(ticket.category, "general");
        assert_eq!(ticket.priority, TicketPriority::Medium);
        let closed = update_ticket(
            &conn,
            ticket.id,
            TicketUpdate {
                status: Some(TicketStatus::Closed),
                ..TicketUpdate::default()
            },
        )
        .expect("close");
        assert_eq!(closed.status, TicketStatus::Closed);
        delete_ticket(&conn, ticket.id).expect("delete ticket");
    }
}
