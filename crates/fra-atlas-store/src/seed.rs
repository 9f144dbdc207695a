// SPDX-License-Identifier: Apache-2.0

use crate::schema::TABLES;
use crate::writes::{
    insert_asset, insert_boundary, insert_claim, insert_document, insert_land_parcel,
    insert_patta_holder, insert_scheme, insert_ticket, insert_village, NewAsset, NewBoundary,
    NewLandParcel, NewPattaHolder, NewScheme, NewVillage,
};
use crate::StoreError;
use fra_atlas_model::{
    AssetType, ClaimStatus, ClaimType, DemarcationStatus, DocumentStatus, NewClaim, NewDocument,
    NewSupportTicket, TicketPriority, VerificationStatus,
};
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub reset: bool,
    pub inserted: BTreeMap<&'static str, usize>,
    pub skipped: Vec<&'static str>,
}

/// Tables that are seeded together; a group is skipped if any member has rows.
const GROUPS: [&[&str]; 7] = [
    &["claims", "patta_holders", "land_parcels"],
    &["villages"],
    &["village_assets"],
    &["village_boundaries"],
    &["schemes"],
    &["documents"],
    &["support_tickets"],
];

struct DemoVillage {
    name: &'static str,
    district: &'static str,
    state: &'static str,
    population: i64,
    tribal_population: i64,
    total_area: f64,
    forest_area: f64,
    lat: f64,
    lon: f64,
}

static VILLAGES: [DemoVillage; 4] = [
    DemoVillage {
        name: "Jamguda",
        district: "Kalahandi",
        state: "Odisha",
        population: 1240,
        tribal_population: 980,
        total_area: 820.0,
        forest_area: 410.5,
        lat: 19.91,
        lon: 83.17,
    },
    DemoVillage {
        name: "Baiga Chak",
        district: "Dindori",
        state: "Madhya Pradesh",
        population: 860,
        tribal_population: 790,
        total_area: 640.0,
        forest_area: 355.0,
        lat: 22.94,
        lon: 81.08,
    },
    DemoVillage {
        name: "Gundala",
        district: "Bhadradri Kothagudem",
        state: "Telangana",
        population: 1530,
        tribal_population: 1100,
        total_area: 910.0,
        forest_area: 300.0,
        lat: 17.55,
        lon: 80.62,
    },
    DemoVillage {
        name: "Jampui",
        district: "North Tripura",
        state: "Tripura",
        population: 700,
        tribal_population: 690,
        total_area: 450.0,
        forest_area: 280.0,
        lat: 23.98,
        lon: 92.27,
    },
];

/// Claims per demo village: (suffix, applicant, type, status, area).
static CLAIMS: [(&str, &str, ClaimType, ClaimStatus, f64); 8] = [
    ("0001", "Sukru Majhi", ClaimType::Ifr, ClaimStatus::Granted, 2.4),
    ("0002", "Jamguda Gram Sabha", ClaimType::Cfr, ClaimStatus::UnderReview, 145.0),
    ("0003", "Phool Singh Baiga", ClaimType::Ifr, ClaimStatus::Pending, 1.8),
    ("0004", "Dindori Gram Sabha", ClaimType::Cr, ClaimStatus::Granted, 36.0),
    ("0005", "Sammakka Koya", ClaimType::Ifr, ClaimStatus::Rejected, 3.1),
    ("0006", "Gundala Gram Sabha", ClaimType::Cfr, ClaimStatus::Pending, 210.0),
    ("0007", "Lalthanga Darlong", ClaimType::Ifr, ClaimStatus::Granted, 1.2),
    ("0008", "Biren Reang", ClaimType::Ifr, ClaimStatus::UnderReview, 0.9),
];

fn square(lon: f64, lat: f64, half: f64) -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon - half, lat - half],
            [lon + half, lat - half],
            [lon + half, lat + half],
            [lon - half, lat + half],
            [lon - half, lat - half]
        ]]
    })
}

fn table_has_rows(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let any: i64 = conn.query_row(
        &format!("SELECT EXISTS (SELECT 1 FROM {table})"),
        [],
        |row| row.get(0),
    )?;
    Ok(any != 0)
}

/// Inserts demo rows into empty tables. `reset` deletes existing rows first.
pub fn seed_demo(conn: &mut Connection, reset: bool) -> Result<SeedReport, StoreError> {
    let tx = conn.transaction()?;
    let mut report = SeedReport {
        reset,
        ..SeedReport::default()
    };
    if reset {
        for table in TABLES.iter().rev() {
            tx.execute(&format!("DELETE FROM {table}"), [])?;
        }
    }
    for group in GROUPS {
        let mut occupied = false;
        for table in group {
            occupied |= table_has_rows(&tx, table)?;
        }
        if occupied {
            report.skipped.extend(group.iter().copied());
            continue;
        }
        for (table, count) in seed_group(&tx, group[0])? {
            report.inserted.insert(table, count);
        }
    }
    tx.commit()?;
    info!(
        reset,
        inserted = report.inserted.values().sum::<usize>(),
        skipped = report.skipped.len(),
        "demo seed applied"
    );
    Ok(report)
}

fn seed_group(tx: &Transaction<'_>, head: &str) -> Result<Vec<(&'static str, usize)>, StoreError> {
    match head {
        "claims" => seed_claims(tx),
        "villages" => {
            for v in &VILLAGES {
                insert_village(
                    tx,
                    &NewVillage {
                        village_name: v.name.to_string(),
                        district: v.district.to_string(),
                        state: v.state.to_string(),
                        population: v.population,
                        tribal_population: v.tribal_population,
                        total_area_hectares: v.total_area,
                        forest_area_hectares: v.forest_area,
                        latitude: Some(v.lat),
                        longitude: Some(v.lon),
                    },
                )?;
            }
            Ok(vec![("villages", VILLAGES.len())])
        }
        "village_assets" => {
            let kinds = [
                (AssetType::WaterBody, 4.5, 0.91),
                (AssetType::Forest, 120.0, 0.88),
                (AssetType::AgriculturalLand, 60.0, 0.82),
                (AssetType::Homestead, 8.0, 0.76),
            ];
            let mut count = 0;
            for v in &VILLAGES {
                for (i, (kind, area, confidence)) in kinds.iter().enumerate() {
                    let offset = 0.002 * (i as f64 + 1.0);
                    insert_asset(
                        tx,
                        &NewAsset {
                            village_name: v.name.to_string(),
                            district: v.district.to_string(),
                            state: v.state.to_string(),
                            asset_type: *kind,
                            area_hectares: *area,
                            latitude: Some(v.lat + offset),
                            longitude: Some(v.lon - offset),
                            confidence_score: *confidence,
                            detection_method: Some("satellite_classification".to_string()),
                        },
                    )?;
                    count += 1;
                }
            }
            Ok(vec![("village_assets", count)])
        }
        "village_boundaries" => {
            for v in &VILLAGES {
                insert_boundary(
                    tx,
                    &NewBoundary {
                        village_name: v.name.to_string(),
                        district: v.district.to_string(),
                        state: v.state.to_string(),
                        area_sqkm: v.total_area / 100.0,
                        geometry: square(v.lon, v.lat, 0.01),
                    },
                )?;
            }
            Ok(vec![("village_boundaries", VILLAGES.len())])
        }
        "schemes" => seed_schemes(tx),
        "documents" => {
            let docs = [
                ("Form-A_FRA_OD_0001.pdf", "claim_form", Some("FRA_OD_0001"), DocumentStatus::Processed),
                ("Gram_Sabha_Resolution_Dindori.pdf", "resolution", Some("FRA_MA_0004"), DocumentStatus::Uploaded),
                ("Survey_Map_Gundala.png", "survey_map", None, DocumentStatus::Processing),
            ];
            for (name, kind, claim_id, status) in docs {
                insert_document(
                    tx,
                    NewDocument {
                        document_name: name.to_string(),
                        document_type: kind.to_string(),
                        claim_id: claim_id.map(str::to_string),
                        file_path: Some(format!("uploads/{name}")),
                        file_size: Some(204_800),
                        status: Some(status),
                        uploaded_by: Some("district.officer".to_string()),
                    },
                )?;
            }
            Ok(vec![("documents", docs.len())])
        }
        "support_tickets" => {
            let tickets = [
                ("Boundary layer not loading", "Village polygons missing for Tripura.", TicketPriority::High),
                ("Claim status not updated", "FRA_OD_0002 still shows under review.", TicketPriority::Medium),
            ];
            for (i, (subject, description, priority)) in tickets.into_iter().enumerate() {
                insert_ticket(
                    tx,
                    NewSupportTicket {
                        subject: subject.to_string(),
                        description: description.to_string(),
                        category: Some("technical".to_string()),
                        priority: Some(priority),
                        submitted_by: Some("field.officer".to_string()),
                        email: Some("support@fra-atlas.example".to_string()),
                    },
                    1_700_000_000_000 + i as u128,
                )?;
            }
            Ok(vec![("support_tickets", tickets.len())])
        }
        _ => Ok(Vec::new()),
    }
}

fn seed_claims(tx: &Transaction<'_>) -> Result<Vec<(&'static str, usize)>, StoreError> {
    let mut holders = 0;
    let mut parcels = 0;
    for (i, (suffix, applicant, claim_type, status, area)) in CLAIMS.iter().enumerate() {
        let village = &VILLAGES[i / 2];
        let claim_id = format!(
            "FRA_{}_{suffix}",
            fra_atlas_model::state_prefix(village.state)
        );
        let claim = insert_claim(
            tx,
            NewClaim {
                claim_id: Some(claim_id.clone()),
                applicant_name: (*applicant).to_string(),
                father_name: None,
                village_name: village.name.to_string(),
                district: village.district.to_string(),
                state: village.state.to_string(),
                claim_type: *claim_type,
                status: Some(*status),
                area_claimed: Some(*area),
                latitude: Some(village.lat + 0.001 * i as f64),
                longitude: Some(village.lon + 0.001 * i as f64),
                application_date: Some(format!("2023-0{}-15", i % 9 + 1)),
            },
            0,
        )?;
        if *claim_type == ClaimType::Ifr {
            insert_patta_holder(
                tx,
                &NewPattaHolder {
                    patta_number: format!("PATTA-{suffix}"),
                    claim_id: claim.claim_id.clone(),
                    holder_name: claim.applicant_name.clone(),
                    father_name: None,
                    gender: Some(if i % 2 == 0 { "M" } else { "F" }.to_string()),
                    age: Some(35 + i as i64),
                    caste_category: Some("ST".to_string()),
                    family_members: Some(5),
                    land_area: *area,
                    land_use: Some("cultivation".to_string()),
                    verification_status: if *status == ClaimStatus::Granted {
                        VerificationStatus::Verified
                    } else {
                        VerificationStatus::Pending
                    },
                    latitude: claim.latitude,
                    longitude: claim.longitude,
                    issue_date: claim.approval_date.clone(),
                },
            )?;
            holders += 1;
        }
        insert_land_parcel(
            tx,
            &NewLandParcel {
                parcel_id: format!("PARCEL-{suffix}"),
                claim_id: claim.claim_id.clone(),
                survey_number: Some(format!("SY-{}", 100 + i)),
                khasra_number: Some(format!("KH-{}", 40 + i)),
                land_classification: Some("forest".to_string()),
                area_hectares: *area,
                soil_type: Some("red loam".to_string()),
                irrigation_source: Some("rainfed".to_string()),
                demarcation_status: match status {
                    ClaimStatus::Granted => DemarcationStatus::Completed,
                    ClaimStatus::Rejected => DemarcationStatus::Disputed,
                    _ => DemarcationStatus::Pending,
                },
                boundary_coordinates: claim
                    .longitude
                    .zip(claim.latitude)
                    .map(|(lon, lat)| square(lon, lat, 0.0005)["coordinates"].clone()),
            },
        )?;
        parcels += 1;
    }
    Ok(vec![
        ("claims", CLAIMS.len()),
        ("patta_holders", holders),
        ("land_parcels", parcels),
    ])
}

fn seed_schemes(tx: &Transaction<'_>) -> Result<Vec<(&'static str, usize)>, StoreError> {
    let schemes = [
        ("PM-KISAN", "Ministry of Agriculture and Farmers Welfare", "Income support to landholding farmer families.", json!({"land_ownership": true}), true),
        ("Jal Jeevan Mission", "Ministry of Jal Shakti", "Functional household tap connections.", json!({"rural": true}), true),
        ("MGNREGA", "Ministry of Rural Development", "Guaranteed wage employment for rural households.", json!({"rural": true, "adult_members": true}), true),
        ("PMAY-G", "Ministry of Rural Development", "Pucca housing for rural households.", json!({"houseless_or_kutcha": true}), true),
        ("Van Dhan Vikas Karyakram", "Ministry of Tribal Affairs", "Value addition for minor forest produce.", json!({"tribal": true, "forest_dwelling": true}), true),
        ("DAPSC Legacy Grant", "Ministry of Tribal Affairs", "Discontinued development grant.", json!({}), false),
    ];
    for (name, ministry, description, criteria, active) in &schemes {
        insert_scheme(
            tx,
            &NewScheme {
                scheme_name: (*name).to_string(),
                ministry: Some((*ministry).to_string()),
                description: Some((*description).to_string()),
                eligibility_criteria: criteria.clone(),
                benefits: Some((*description).to_string()),
                is_active: *active,
            },
        )?;
    }
    Ok(vec![("schemes", schemes.len())])
}
