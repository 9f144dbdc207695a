// SPDX-License-Identifier: Apache-2.0

use crate::{StoreError, SQL_NOW};
use fra_atlas_model::{
    AssetType, ClaimStatus, ClaimType, DemarcationStatus, DocumentStatus, TicketPriority,
    TicketStatus, VerificationStatus,
};
use rusqlite::Connection;
use tracing::info;

pub const SCHEMA_VERSION: i64 = 1;

/// Every table the service owns, parents before children.
pub const TABLES: [&str; 9] = [
    "claims",
    "patta_holders",
    "land_parcels",
    "villages",
    "village_assets",
    "village_boundaries",
    "schemes",
    "documents",
    "support_tickets",
];

fn migration_v1() -> String {
    format!(
        "
        CREATE TABLE IF NOT EXISTS claims (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          claim_id TEXT NOT NULL UNIQUE,
          applicant_name TEXT NOT NULL,
          father_name TEXT,
          village_name TEXT NOT NULL COLLATE NOCASE,
          district TEXT NOT NULL COLLATE NOCASE,
          state TEXT NOT NULL COLLATE NOCASE,
          claim_type TEXT NOT NULL CHECK (claim_type IN ({claim_types})),
          status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ({claim_statuses})),
          area_claimed REAL NOT NULL DEFAULT 0 CHECK (area_claimed >= 0),
          latitude REAL,
          longitude REAL,
          application_date TEXT,
          approval_date TEXT,
          created_at TEXT NOT NULL DEFAULT ({now}),
          updated_at TEXT NOT NULL DEFAULT ({now})
        );
        CREATE INDEX IF NOT EXISTS idx_claims_state_district ON claims(state, district);
        CREATE INDEX IF NOT EXISTS idx_claims_village ON claims(village_name);
        CREATE INDEX IF NOT EXISTS idx_claims_status ON claims(status);

        CREATE TABLE IF NOT EXISTS patta_holders (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          patta_number TEXT NOT NULL UNIQUE,
          claim_id TEXT NOT NULL REFERENCES claims(claim_id) ON DELETE CASCADE,
          holder_name TEXT NOT NULL,
          father_name TEXT,
          gender TEXT,
          age INTEGER,
          caste_category TEXT,
          family_members INTEGER,
          land_area REAL NOT NULL DEFAULT 0,
          land_use TEXT,
          verification_status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (verification_status IN ({verification_statuses})),
          latitude REAL,
          longitude REAL,
          issue_date TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_patta_holders_claim ON patta_holders(claim_id);

        CREATE TABLE IF NOT EXISTS land_parcels (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          parcel_id TEXT NOT NULL UNIQUE,
          claim_id TEXT NOT NULL REFERENCES claims(claim_id) ON DELETE CASCADE,
          survey_number TEXT,
          khasra_number TEXT,
          land_classification TEXT,
          area_hectares REAL NOT NULL DEFAULT 0,
          soil_type TEXT,
          irrigation_source TEXT,
          demarcation_status TEXT NOT NULL DEFAULT 'Pending'
            CHECK (demarcation_status IN ({demarcation_statuses})),
          boundary_coordinates TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_land_parcels_claim ON land_parcels(claim_id);

        CREATE TABLE IF NOT EXISTS villages (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          village_name TEXT NOT NULL COLLATE NOCASE,
          district TEXT NOT NULL COLLATE NOCASE,
          state TEXT NOT NULL COLLATE NOCASE,
          population INTEGER NOT NULL DEFAULT 0,
          tribal_population INTEGER NOT NULL DEFAULT 0,
          total_area_hectares REAL NOT NULL DEFAULT 0,
          forest_area_hectares REAL NOT NULL DEFAULT 0,
          latitude REAL,
          longitude REAL,
          UNIQUE (village_name, district, state)
        );

        CREATE TABLE IF NOT EXISTS village_assets (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          village_name TEXT NOT NULL COLLATE NOCASE,
          district TEXT NOT NULL COLLATE NOCASE,
          state TEXT NOT NULL COLLATE NOCASE,
          asset_type TEXT NOT NULL CHECK (asset_type IN ({asset_types})),
          area_hectares REAL NOT NULL DEFAULT 0,
          latitude REAL,
          longitude REAL,
          confidence_score REAL NOT NULL DEFAULT 0
            CHECK (confidence_score >= 0 AND confidence_score <= 1),
          detection_method TEXT,
          detected_at TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_village_assets_village ON village_assets(village_name);

        CREATE TABLE IF NOT EXISTS village_boundaries (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          village_name TEXT NOT NULL COLLATE NOCASE,
          district TEXT NOT NULL COLLATE NOCASE,
          state TEXT NOT NULL COLLATE NOCASE,
          area_sqkm REAL NOT NULL DEFAULT 0,
          geometry TEXT NOT NULL CHECK (json_valid(geometry)),
          UNIQUE (village_name, district, state)
        );
        CREATE INDEX IF NOT EXISTS idx_village_boundaries_state ON village_boundaries(state);

        CREATE TABLE IF NOT EXISTS schemes (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          scheme_name TEXT NOT NULL UNIQUE,
          ministry TEXT,
          description TEXT,
          eligibility_criteria TEXT NOT NULL DEFAULT '{{}}' CHECK (json_valid(eligibility_criteria)),
          benefits TEXT,
          is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS documents (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          document_name TEXT NOT NULL,
          document_type TEXT NOT NULL,
          claim_id TEXT,
          file_path TEXT,
          file_size INTEGER,
          status TEXT NOT NULL DEFAULT 'uploaded' CHECK (status IN ({document_statuses})),
          uploaded_by TEXT,
          uploaded_at TEXT NOT NULL DEFAULT ({now}),
          updated_at TEXT NOT NULL DEFAULT ({now})
        );
        CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(status);

        CREATE TABLE IF NOT EXISTS support_tickets (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          ticket_number TEXT NOT NULL UNIQUE,
          subject TEXT NOT NULL,
          description TEXT NOT NULL,
          category TEXT NOT NULL DEFAULT 'general',
          priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ({ticket_priorities})),
          status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ({ticket_statuses})),
          submitted_by TEXT,
          email TEXT,
          created_at TEXT NOT NULL DEFAULT ({now}),
          updated_at TEXT NOT NULL DEFAULT ({now})
        );
        CREATE INDEX IF NOT EXISTS idx_support_tickets_status ON support_tickets(status);
        ",
        claim_types = ClaimType::sql_value_list(),
        claim_statuses = ClaimStatus::sql_value_list(),
        verification_statuses = VerificationStatus::sql_value_list(),
        demarcation_statuses = DemarcationStatus::sql_value_list(),
        asset_types = AssetType::sql_value_list(),
        document_statuses = DocumentStatus::sql_value_list(),
        ticket_priorities = TicketPriority::sql_value_list(),
        ticket_statuses = TicketStatus::sql_value_list(),
        now = SQL_NOW,
    )
}

pub fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))?)
}

/// Applies pending migrations. Never drops or rewrites existing data.
pub fn migrate(conn: &mut Connection) -> Result<i64, StoreError> {
    let current = schema_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            found: current,
            expected: SCHEMA_VERSION,
        });
    }
    let tx = conn.transaction()?;
    if current < 1 {
        tx.execute_batch(&migration_v1())?;
    }
    tx.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))?;
    tx.commit()?;
    if current != SCHEMA_VERSION {
        info!(from = current, to = SCHEMA_VERSION, "schema migrated");
    }
    Ok(SCHEMA_VERSION)
}

pub fn verify_schema(conn: &Connection) -> Result<(), StoreError> {
    let found = schema_version(conn)?;
    if found != SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            found,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(())
}
