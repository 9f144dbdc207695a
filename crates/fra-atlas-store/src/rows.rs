// SPDX-License-Identifier: Apache-2.0

//! Column lists and row decoders shared by the write paths and the query crate.

use fra_atlas_model::{
    AssetType, Claim, ClaimStatus, ClaimType, DemarcationStatus, Document, DocumentStatus,
    LandParcel, PattaHolder, Scheme, SupportTicket, TicketPriority, TicketStatus,
    ValidationError, Village, VillageAsset, VillageBoundary, VerificationStatus,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

pub const CLAIM_COLUMNS: &str = "id, claim_id, applicant_name, father_name, village_name, \
     district, state, claim_type, status, area_claimed, latitude, longitude, application_date, \
     approval_date, created_at, updated_at";

pub const PATTA_COLUMNS: &str = "id, patta_number, claim_id, holder_name, father_name, gender, \
     age, caste_category, family_members, land_area, land_use, verification_status, latitude, \
     longitude, issue_date";

pub const PARCEL_COLUMNS: &str = "id, parcel_id, claim_id, survey_number, khasra_number, \
     land_classification, area_hectares, soil_type, irrigation_source, demarcation_status, \
     boundary_coordinates";

pub const VILLAGE_COLUMNS: &str = "id, village_name, district, state, population, \
     tribal_population, total_area_hectares, forest_area_hectares, latitude, longitude";

pub const ASSET_COLUMNS: &str = "id, village_name, district, state, asset_type, area_hectares, \
     latitude, longitude, confidence_score, detection_method, detected_at";

pub const BOUNDARY_COLUMNS: &str = "id, village_name, district, state, area_sqkm, geometry";

pub const SCHEME_COLUMNS: &str =
    "id, scheme_name, ministry, description, eligibility_criteria, benefits, is_active";

pub const DOCUMENT_COLUMNS: &str = "id, document_name, document_type, claim_id, file_path, \
     file_size, status, uploaded_by, uploaded_at, updated_at";

pub const TICKET_COLUMNS: &str = "id, ticket_number, subject, description, category, priority, \
     status, submitted_by, email, created_at, updated_at";

fn enum_col<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Result<T, ValidationError>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn strict_json_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Value> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn loose_json(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

pub fn decode_claim(row: &Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        id: row.get(0)?,
        claim_id: row.get(1)?,
        applicant_name: row.get(2)?,
        father_name: row.get(3)?,
        village_name: row.get(4)?,
        district: row.get(5)?,
        state: row.get(6)?,
        claim_type: enum_col(row, 7, ClaimType::parse)?,
        status: enum_col(row, 8, ClaimStatus::parse)?,
        area_claimed: row.get::<_, Option<f64>>(9)?.unwrap_or(0.0),
        latitude: row.get(10)?,
        longitude: row.get(11)?,
        application_date: row.get(12)?,
        approval_date: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

pub fn decode_patta_holder(row: &Row<'_>) -> rusqlite::Result<PattaHolder> {
    Ok(PattaHolder {
        id: row.get(0)?,
        patta_number: row.get(1)?,
        claim_id: row.get(2)?,
        holder_name: row.get(3)?,
        father_name: row.get(4)?,
        gender: row.get(5)?,
        age: row.get(6)?,
        caste_category: row.get(7)?,
        family_members: row.get(8)?,
        land_area: row.get::<_, Option<f64>>(9)?.unwrap_or(0.0),
        land_use: row.get(10)?,
        verification_status: enum_col(row, 11, VerificationStatus::parse)?,
        latitude: row.get(12)?,
        longitude: row.get(13)?,
        issue_date: row.get(14)?,
    })
}

pub fn decode_land_parcel(row: &Row<'_>) -> rusqlite::Result<LandParcel> {
    Ok(LandParcel {
        id: row.get(0)?,
        parcel_id: row.get(1)?,
        claim_id: row.get(2)?,
        survey_number: row.get(3)?,
        khasra_number: row.get(4)?,
        land_classification: row.get(5)?,
        area_hectares: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
        soil_type: row.get(7)?,
        irrigation_source: row.get(8)?,
        demarcation_status: enum_col(row, 9, DemarcationStatus::parse)?,
        boundary_coordinates: row.get::<_, Option<String>>(10)?.map(loose_json),
    })
}

pub fn decode_village(row: &Row<'_>) -> rusqlite::Result<Village> {
    Ok(Village {
        id: row.get(0)?,
        village_name: row.get(1)?,
        district: row.get(2)?,
        state: row.get(3)?,
        population: row.get(4)?,
        tribal_population: row.get(5)?,
        total_area_hectares: row.get(6)?,
        forest_area_hectares: row.get(7)?,
        latitude: row.get(8)?,
        longitude: row.get(9)?,
    })
}

pub fn decode_asset(row: &Row<'_>) -> rusqlite::Result<VillageAsset> {
    Ok(VillageAsset {
        id: row.get(0)?,
        village_name: row.get(1)?,
        district: row.get(2)?,
        state: row.get(3)?,
        asset_type: enum_col(row, 4, AssetType::parse)?,
        area_hectares: row.get(5)?,
        latitude: row.get(6)?,
        longitude: row.get(7)?,
        confidence_score: row.get(8)?,
        detection_method: row.get(9)?,
        detected_at: row.get(10)?,
    })
}

/// Fails with `FromSqlConversionFailure` when the stored geometry is not JSON.
pub fn decode_boundary(row: &Row<'_>) -> rusqlite::Result<VillageBoundary> {
    Ok(VillageBoundary {
        id: row.get(0)?,
        village_name: row.get(1)?,
        district: row.get(2)?,
        state: row.get(3)?,
        area_sqkm: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        geometry: strict_json_col(row, 5)?,
    })
}

pub fn decode_scheme(row: &Row<'_>) -> rusqlite::Result<Scheme> {
    Ok(Scheme {
        id: row.get(0)?,
        scheme_name: row.get(1)?,
        ministry: row.get(2)?,
        description: row.get(3)?,
        eligibility_criteria: loose_json(row.get(4)?),
        benefits: row.get(5)?,
        is_active: row.get(6)?,
    })
}

pub fn decode_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        document_name: row.get(1)?,
        document_type: row.get(2)?,
        claim_id: row.get(3)?,
        file_path: row.get(4)?,
        file_size: row.get(5)?,
        status: enum_col(row, 6, DocumentStatus::parse)?,
        uploaded_by: row.get(7)?,
        uploaded_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub fn decode_ticket(row: &Row<'_>) -> rusqlite::Result<SupportTicket> {
    Ok(SupportTicket {
        id: row.get(0)?,
        ticket_number: row.get(1)?,
        subject: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        priority: enum_col(row, 5, TicketPriority::parse)?,
        status: enum_col(row, 6, TicketStatus::parse)?,
        submitted_by: row.get(7)?,
        email: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

pub fn fetch_claim(conn: &Connection, claim_id: &str) -> rusqlite::Result<Option<Claim>> {
    conn.query_row(
        &format!("SELECT {CLAIM_COLUMNS} FROM claims WHERE claim_id = ?1"),
        params![claim_id],
        decode_claim,
    )
    .optional()
}

pub fn fetch_village(conn: &Connection, id: i64) -> rusqlite::Result<Option<Village>> {
    conn.query_row(
        &format!("SELECT {VILLAGE_COLUMNS} FROM villages WHERE id = ?1"),
        params![id],
        decode_village,
    )
    .optional()
}

pub fn fetch_document(conn: &Connection, id: i64) -> rusqlite::Result<Option<Document>> {
    conn.query_row(
        &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
        params![id],
        decode_document,
    )
    .optional()
}

pub fn fetch_ticket(conn: &Connection, id: i64) -> rusqlite::Result<Option<SupportTicket>> {
    conn.query_row(
        &format!("SELECT {TICKET_COLUMNS} FROM support_tickets WHERE id = ?1"),
        params![id],
        decode_ticket,
    )
    .optional()
}

/// True when the error came from a decoder rejecting stored content.
#[must_use]
pub fn is_corrupt_row(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::FromSqlConversionFailure(..))
}
