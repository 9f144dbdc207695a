// SPDX-License-Identifier: Apache-2.0

use crate::aggregate::{village_claim_rollup, ClaimRollup};
use crate::filters::{Predicate, VillageFilter};
use crate::QueryError;
use fra_atlas_model::{
    normalize_location, AssetType, LandParcel, PattaHolder, Scheme, Village, VillageAsset,
};
use fra_atlas_store::rows::{
    decode_asset, decode_land_parcel, decode_patta_holder, decode_scheme, decode_village,
    fetch_claim, fetch_village, ASSET_COLUMNS, PARCEL_COLUMNS, PATTA_COLUMNS, SCHEME_COLUMNS,
    VILLAGE_COLUMNS,
};
use fra_atlas_store::schema_version;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;
use std::collections::BTreeMap;

fn collect<T>(
    conn: &Connection,
    sql: &str,
    predicate: &Predicate,
    decode: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, QueryError> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt
        .query_map(params_from_iter(predicate.params().iter()), decode)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `None` when the claim itself is unknown.
pub fn patta_holders_by_claim(
    conn: &Connection,
    claim_id: &str,
) -> Result<Option<Vec<PattaHolder>>, QueryError> {
    let claim_id = claim_id.trim();
    if fetch_claim(conn, claim_id)?.is_none() {
        return Ok(None);
    }
    let mut predicate = Predicate::default();
    predicate.equals("claim_id", claim_id.to_string());
    collect(
        conn,
        &format!(
            "SELECT {PATTA_COLUMNS} FROM patta_holders{} ORDER BY patta_number",
            predicate.where_clause()
        ),
        &predicate,
        decode_patta_holder,
    )
    .map(Some)
}

fn qualified(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Holders whose claim lies in `state`.
pub fn patta_holders_by_state(
    conn: &Connection,
    state: &str,
) -> Result<Vec<PattaHolder>, QueryError> {
    let mut predicate = Predicate::default();
    predicate.equals("c.state", normalize_location(state));
    collect(
        conn,
        &format!(
            "SELECT {} FROM patta_holders p JOIN claims c ON c.claim_id = p.claim_id{} \
             ORDER BY p.patta_number",
            qualified(PATTA_COLUMNS, "p"),
            predicate.where_clause()
        ),
        &predicate,
        decode_patta_holder,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PattaHolderPoint {
    #[serde(flatten)]
    pub holder: PattaHolder,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub claim_type: String,
    pub claim_status: String,
}

/// Holders that carry both coordinates, with their claim's location keys.
pub fn patta_holders_with_coordinates(
    conn: &Connection,
    state: Option<&str>,
) -> Result<Vec<PattaHolderPoint>, QueryError> {
    let mut predicate = Predicate::default();
    if let Some(state) = state {
        predicate.equals("c.state", normalize_location(state));
    }
    let extra = if predicate.where_clause().is_empty() {
        " WHERE p.latitude IS NOT NULL AND p.longitude IS NOT NULL".to_string()
    } else {
        format!(
            "{} AND p.latitude IS NOT NULL AND p.longitude IS NOT NULL",
            predicate.where_clause()
        )
    };
    let sql = format!(
        "SELECT {}, c.village_name, c.district, c.state, c.claim_type, c.status \
         FROM patta_holders p JOIN claims c ON c.claim_id = p.claim_id{extra} \
         ORDER BY p.patta_number",
        qualified(PATTA_COLUMNS, "p"),
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(predicate.params().iter()), |row| {
            Ok(PattaHolderPoint {
                holder: decode_patta_holder(row)?,
                village_name: row.get(15)?,
                district: row.get(16)?,
                state: row.get(17)?,
                claim_type: row.get(18)?,
                claim_status: row.get(19)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// `None` when the claim itself is unknown.
pub fn land_parcels_by_claim(
    conn: &Connection,
    claim_id: &str,
) -> Result<Option<Vec<LandParcel>>, QueryError> {
    let claim_id = claim_id.trim();
    if fetch_claim(conn, claim_id)?.is_none() {
        return Ok(None);
    }
    let mut predicate = Predicate::default();
    predicate.equals("claim_id", claim_id.to_string());
    collect(
        conn,
        &format!(
            "SELECT {PARCEL_COLUMNS} FROM land_parcels{} ORDER BY parcel_id",
            predicate.where_clause()
        ),
        &predicate,
        decode_land_parcel,
    )
    .map(Some)
}

pub fn list_villages(conn: &Connection, filter: &VillageFilter) -> Result<Vec<Village>, QueryError> {
    let predicate = filter.predicate();
    collect(
        conn,
        &format!(
            "SELECT {VILLAGE_COLUMNS} FROM villages{} ORDER BY state, district, village_name, id",
            predicate.where_clause()
        ),
        &predicate,
        decode_village,
    )
}

pub fn get_village(conn: &Connection, id: i64) -> Result<Option<Village>, QueryError> {
    Ok(fetch_village(conn, id)?)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AssetTotals {
    pub count: u64,
    pub area_hectares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub total_assets: u64,
    pub total_area_hectares: f64,
    pub by_type: BTreeMap<String, AssetTotals>,
}

impl AssetSummary {
    #[must_use]
    pub fn from_assets(assets: &[VillageAsset]) -> Self {
        let mut by_type: BTreeMap<String, AssetTotals> = AssetType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), AssetTotals::default()))
            .collect();
        let mut total_area_hectares = 0.0;
        for asset in assets {
            let entry = by_type.entry(asset.asset_type.as_str().to_string()).or_default();
            entry.count += 1;
            entry.area_hectares += asset.area_hectares;
            total_area_hectares += asset.area_hectares;
        }
        Self {
            total_assets: assets.len() as u64,
            total_area_hectares,
            by_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VillageAssets {
    pub village: Village,
    pub assets: Vec<VillageAsset>,
    pub summary: AssetSummary,
}

/// Assets are joined to the village by name only.
pub fn assets_for_village_name(
    conn: &Connection,
    village_name: &str,
) -> Result<Vec<VillageAsset>, QueryError> {
    let mut predicate = Predicate::default();
    predicate.equals("village_name", normalize_location(village_name));
    collect(
        conn,
        &format!(
            "SELECT {ASSET_COLUMNS} FROM village_assets{} ORDER BY asset_type, id",
            predicate.where_clause()
        ),
        &predicate,
        decode_asset,
    )
}

pub fn village_assets(conn: &Connection, id: i64) -> Result<Option<VillageAssets>, QueryError> {
    let Some(village) = fetch_village(conn, id)? else {
        return Ok(None);
    };
    let assets = assets_for_village_name(conn, &village.village_name)?;
    let summary = AssetSummary::from_assets(&assets);
    Ok(Some(VillageAssets {
        village,
        assets,
        summary,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedVillage {
    pub village: Village,
    pub tribal_percentage: f64,
    pub forest_cover_percentage: f64,
    pub asset_summary: AssetSummary,
    pub claim_stats: ClaimRollup,
    pub patta_holders: u64,
}

/// Village profile with asset, claim and patta rollups.
pub fn village_enhanced(conn: &Connection, id: i64) -> Result<Option<EnhancedVillage>, QueryError> {
    let Some(village) = fetch_village(conn, id)? else {
        return Ok(None);
    };
    let assets = assets_for_village_name(conn, &village.village_name)?;
    let claim_stats = village_claim_rollup(conn, &village.village_name)?;
    let holders: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patta_holders p JOIN claims c ON c.claim_id = p.claim_id
         WHERE c.village_name = ?1",
        params![village.village_name],
        |row| row.get(0),
    )?;
    Ok(Some(EnhancedVillage {
        tribal_percentage: crate::percentage(
            village.tribal_population as f64,
            village.population as f64,
        ),
        forest_cover_percentage: crate::percentage(
            village.forest_area_hectares,
            village.total_area_hectares,
        ),
        asset_summary: AssetSummary::from_assets(&assets),
        claim_stats,
        patta_holders: u64::try_from(holders).unwrap_or(0),
        village,
    }))
}

pub fn active_schemes(conn: &Connection) -> Result<Vec<Scheme>, QueryError> {
    let mut predicate = Predicate::default();
    predicate.equals("is_active", 1_i64);
    collect(
        conn,
        &format!(
            "SELECT {SCHEME_COLUMNS} FROM schemes{} ORDER BY scheme_name",
            predicate.where_clause()
        ),
        &predicate,
        decode_scheme,
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreHealth {
    pub schema_version: i64,
    pub sqlite_version: String,
    pub claims: u64,
}

/// One round trip through the store.
pub fn store_health(conn: &Connection) -> Result<StoreHealth, QueryError> {
    let (sqlite_version, claims): (String, i64) = conn.query_row(
        "SELECT sqlite_version(), (SELECT COUNT(*) FROM claims)",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(StoreHealth {
        schema_version: schema_version(conn)?,
        sqlite_version,
        claims: u64::try_from(claims).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_prefixes_every_column() {
        assert_eq!(qualified("id, claim_id", "p"), "p.id, p.claim_id");
    }

    #[test]
    fn asset_summary_lists_every_type() {
        let summary = AssetSummary::from_assets(&[]);
        assert_eq!(summary.total_assets, 0);
        assert_eq!(summary.by_type.len(), AssetType::ALL.len());
        assert!(summary.by_type.values().all(|t| t.count == 0));
    }
}
