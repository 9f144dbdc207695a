// SPDX-License-Identifier: Apache-2.0

use fra_atlas_model::{ClaimStatus, ClaimType, NewClaim};
use fra_atlas_query::{
    active_schemes, admin_stats, boundaries_geojson, district_rollups, district_summary,
    land_parcels_by_claim, list_claims, list_documents, list_tickets, page_count,
    patta_holders_by_state, patta_holders_with_coordinates, state_rollups, store_health,
    village_assets, village_enhanced, ClaimFilter, DocumentFilter, PageRequest, QueryErrorCode,
    TicketFilter,
};
use fra_atlas_store::{insert_claim, migrate, open_connection, seed_demo, DbConfig};
use rusqlite::Connection;
use tempfile::TempDir;

fn seeded() -> (TempDir, Connection) {
    let dir = tempfile::tempdir().expect("tmp");
    let cfg = DbConfig {
        path: dir.path().join("atlas.sqlite"),
        ..DbConfig::default()
    };
    let mut conn = open_connection(&cfg).expect("conn");
    migrate(&mut conn).expect("migrate");
    seed_demo(&mut conn, false).expect("seed");
    (dir, conn)
}

fn count_claims(conn: &Connection, sql_where: &str) -> u64 {
    let n: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM claims {sql_where}"), [], |r| r.get(0))
        .expect("count");
    n as u64
}

#[test]
fn total_matches_predicate_count_and_pages_is_ceiling() {
    let (_dir, conn) = seeded();
    let filters = [
        ClaimFilter::default(),
        ClaimFilter {
            state: Some("odisha".to_string()),
            ..ClaimFilter::default()
        },
        ClaimFilter {
            status: Some(ClaimStatus::Granted),
            ..ClaimFilter::default()
        },
        ClaimFilter {
            claim_type: Some(ClaimType::Ifr),
            status: Some(ClaimStatus::Pending),
            ..ClaimFilter::default()
        },
    ];
    let expected = [
        count_claims(&conn, ""),
        count_claims(&conn, "WHERE state = 'Odisha'"),
        count_claims(&conn, "WHERE status = 'granted'"),
        count_claims(&conn, "WHERE claim_type = 'IFR' AND status = 'pending'"),
    ];
    for (filter, expected) in filters.iter().zip(expected) {
        for limit in [1, 3, 20] {
            let page = list_claims(&conn, filter, PageRequest { page: 1, limit }).expect("list");
            assert_eq!(page.pagination.total, expected);
            assert_eq!(page.pagination.pages, page_count(expected, limit));
            assert!(page.data.len() as u64 <= u64::from(limit));
            let by_status: u64 = page.stats.by_status.values().sum();
            assert_eq!(by_status, expected);
        }
    }
}

#[test]
fn pages_walk_every_row_once_in_newest_first_order() {
    let (_dir, conn) = seeded();
    let filter = ClaimFilter::default();
    let total = count_claims(&conn, "");
    let mut seen = Vec::new();
    for page in 1..=page_count(total, 3) as u32 {
        let rows = list_claims(&conn, &filter, PageRequest { page, limit: 3 }).expect("page");
        seen.extend(rows.data.into_iter().map(|c| (c.created_at, c.id)));
    }
    assert_eq!(seen.len() as u64, total);
    let mut sorted = seen.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(seen, sorted);
}

#[test]
fn search_and_village_filters_are_case_insensitive_substrings() {
    let (_dir, conn) = seeded();
    let by_village = list_claims(
        &conn,
        &ClaimFilter {
            village: Some("jamgu".to_string()),
            ..ClaimFilter::default()
        },
        PageRequest::default(),
    )
    .expect("village");
    assert!(by_village.pagination.total > 0);
    assert!(by_village.data.iter().all(|c| c.village_name == "Jamguda"));

    let by_search = list_claims(
        &conn,
        &ClaimFilter {
            search: Some("fra_od".to_string()),
            ..ClaimFilter::default()
        },
        PageRequest::default(),
    )
    .expect("search");
    assert!(by_search.data.iter().all(|c| c.claim_id.starts_with("FRA_OD_")));
}

#[test]
fn created_claim_is_listed_under_its_state() {
    let (_dir, conn) = seeded();
    let claim = insert_claim(
        &conn,
        NewClaim {
            claim_id: None,
            applicant_name: "Test User".to_string(),
            father_name: None,
            village_name: "Jamguda".to_string(),
            district: "Kalahandi".to_string(),
            state: "Odisha".to_string(),
            claim_type: ClaimType::Ifr,
            status: None,
            area_claimed: Some(1.5),
            latitude: None,
            longitude: None,
            application_date: None,
        },
        1_800_000_000_000,
    )
    .expect("insert");
    let page = list_claims(
        &conn,
        &ClaimFilter {
            state: Some("ODISHA".to_string()),
            ..ClaimFilter::default()
        },
        PageRequest::default(),
    )
    .expect("list");
    let found = page
        .data
        .iter()
        .find(|c| c.claim_id == claim.claim_id)
        .expect("new claim listed");
    assert_eq!(found.area_claimed, 1.5);
}

#[test]
fn rollups_guard_percentages_and_coalesce_areas() {
    let (_dir, conn) = seeded();
    let states = state_rollups(&conn).expect("states");
    assert!(!states.is_empty());
    for rollup in &states {
        let sum = rollup.granted_claims
            + rollup.pending_claims
            + rollup.rejected_claims
            + rollup.under_review_claims;
        assert_eq!(sum, rollup.total_claims);
        assert!(rollup.granted_area <= rollup.total_area_claimed);
    }

    let districts = district_rollups(&conn, "odisha").expect("districts");
    assert_eq!(districts.len(), 1);
    assert_eq!(districts[0].district.as_deref(), Some("Kalahandi"));

    let empty = district_summary(&conn, "Nowhere", "Nothing").expect("empty summary");
    assert_eq!(empty.total_claims, 0);
    assert_eq!(empty.total_area_claimed, 0.0);
    assert_eq!(empty.granted_percentage, 0.0);
    assert_eq!(empty.pending_percentage, 0.0);
    assert_eq!(empty.rejected_percentage, 0.0);
    assert_eq!(empty.under_review_percentage, 0.0);
}

#[test]
fn geojson_export_is_deterministic_and_filters_by_state() {
    let (_dir, conn) = seeded();
    let all = boundaries_geojson(&conn, None).expect("all");
    assert_eq!(all, boundaries_geojson(&conn, None).expect("again"));
    let features = all["features"].as_array().expect("features");
    assert!(!features.is_empty());
    for feature in features {
        assert_eq!(feature["type"], "Feature");
        assert!(feature["properties"]["village_name"].is_string());
        assert!(feature["geometry"]["coordinates"].is_array());
    }

    let odisha = boundaries_geojson(&conn, Some("ODISHA")).expect("odisha");
    assert_eq!(odisha["features"].as_array().map(Vec::len), Some(1));

    let none = boundaries_geojson(&conn, Some("Atlantis")).expect("unknown");
    assert_eq!(none, serde_json::json!({"type": "FeatureCollection", "features": []}));
}

#[test]
fn corrupt_geometry_surfaces_as_corrupt_error() {
    let (_dir, conn) = seeded();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints=ON;
         UPDATE village_boundaries SET geometry = 'not json' WHERE village_name = 'Jamguda';",
    )
    .expect("corrupt row");
    let err = boundaries_geojson(&conn, None).expect_err("corrupt");
    assert_eq!(err.code, QueryErrorCode::Corrupt);
}

#[test]
fn lookups_cover_parcels_holders_villages_and_schemes() {
    let (_dir, conn) = seeded();
    assert!(land_parcels_by_claim(&conn, "FRA_XX_404").expect("lookup").is_none());
    let parcels = land_parcels_by_claim(&conn, "FRA_OD_0001")
        .expect("lookup")
        .expect("known claim");
    assert_eq!(parcels.len(), 1);
    assert!(parcels[0].boundary_coordinates.as_ref().is_some_and(|v| v.is_array()));

    let holders = patta_holders_by_state(&conn, "odisha").expect("holders");
    assert!(holders.iter().all(|h| h.claim_id.starts_with("FRA_OD_")));
    let points = patta_holders_with_coordinates(&conn, None).expect("points");
    assert!(points.iter().all(|p| p.holder.latitude.is_some()));

    let assets = village_assets(&conn, 1).expect("assets").expect("village 1");
    assert_eq!(assets.summary.total_assets, assets.assets.len() as u64);
    assert!(village_assets(&conn, 9_999).expect("assets").is_none());

    let enhanced = village_enhanced(&conn, 1).expect("enhanced").expect("village 1");
    assert!(enhanced.claim_stats.total_claims > 0);
    assert!(enhanced.tribal_percentage > 0.0);

    let schemes = active_schemes(&conn).expect("schemes");
    assert!(!schemes.is_empty());
    assert!(schemes.iter().all(|s| s.is_active));
}

#[test]
fn documents_tickets_and_admin_stats() {
    let (_dir, conn) = seeded();
    let docs = list_documents(&conn, &DocumentFilter::default(), PageRequest::default())
        .expect("docs");
    assert_eq!(docs.pagination.total, docs.stats.by_status.values().sum::<u64>());

    let tickets = list_tickets(
        &conn,
        &TicketFilter {
            search: Some("boundary".to_string()),
            ..TicketFilter::default()
        },
        PageRequest::default(),
    )
    .expect("tickets");
    assert_eq!(tickets.pagination.total, 1);

    let stats = admin_stats(&conn).expect("admin");
    assert_eq!(stats.totals["claims"], count_claims(&conn, ""));
    assert_eq!(
        stats.claims_by_status.values().sum::<u64>(),
        stats.totals["claims"]
    );

    let health = store_health(&conn).expect("health");
    assert_eq!(health.schema_version, fra_atlas_store::SCHEMA_VERSION);
}
