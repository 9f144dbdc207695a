// SPDX-License-Identifier: Apache-2.0

use crate::filters::Predicate;
use crate::list::count_by;
use crate::QueryError;
use fra_atlas_model::{normalize_location, ClaimStatus, ClaimType, DocumentStatus, TicketStatus};
use fra_atlas_store::TABLES;
use rusqlite::{params_from_iter, Connection, Row};
use serde::Serialize;
use std::collections::BTreeMap;

/// `value / total * 100` rounded to one decimal; `0.0` whenever `total` is not positive.
#[must_use]
pub fn percentage(value: f64, total: f64) -> f64 {
    if !total.is_finite() || total <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / total * 1000.0).round() / 10.0
}

/// Claim counts and areas for one geographic bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimRollup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village_name: Option<String>,
    pub total_claims: u64,
    pub granted_claims: u64,
    pub pending_claims: u64,
    pub rejected_claims: u64,
    pub under_review_claims: u64,
    pub ifr_claims: u64,
    pub cr_claims: u64,
    pub cfr_claims: u64,
    pub total_area_claimed: f64,
    pub granted_area: f64,
    pub granted_percentage: f64,
    pub pending_percentage: f64,
    pub rejected_percentage: f64,
    pub under_review_percentage: f64,
}

impl ClaimRollup {
    fn from_counts(counts: RawCounts) -> Self {
        let total = counts.total as f64;
        Self {
            state: None,
            district: None,
            village_name: None,
            total_claims: counts.total,
            granted_claims: counts.granted,
            pending_claims: counts.pending,
            rejected_claims: counts.rejected,
            under_review_claims: counts.under_review,
            ifr_claims: counts.ifr,
            cr_claims: counts.cr,
            cfr_claims: counts.cfr,
            total_area_claimed: counts.total_area,
            granted_area: counts.granted_area,
            granted_percentage: percentage(counts.granted as f64, total),
            pending_percentage: percentage(counts.pending as f64, total),
            rejected_percentage: percentage(counts.rejected as f64, total),
            under_review_percentage: percentage(counts.under_review as f64, total),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct RawCounts {
    total: u64,
    granted: u64,
    pending: u64,
    rejected: u64,
    under_review: u64,
    ifr: u64,
    cr: u64,
    cfr: u64,
    total_area: f64,
    granted_area: f64,
}

fn rollup_select() -> String {
    let status = |s: ClaimStatus| {
        format!(
            "COALESCE(SUM(CASE WHEN status = '{}' THEN 1 ELSE 0 END), 0)",
            s.as_str()
        )
    };
    let kind = |t: ClaimType| {
        format!(
            "COALESCE(SUM(CASE WHEN claim_type = '{}' THEN 1 ELSE 0 END), 0)",
            t.as_str()
        )
    };
    [
        "COUNT(*)".to_string(),
        status(ClaimStatus::Granted),
        status(ClaimStatus::Pending),
        status(ClaimStatus::Rejected),
        status(ClaimStatus::UnderReview),
        kind(ClaimType::Ifr),
        kind(ClaimType::Cr),
        kind(ClaimType::Cfr),
        "COALESCE(SUM(COALESCE(area_claimed, 0)), 0)".to_string(),
        "COALESCE(SUM(CASE WHEN status = 'granted' THEN COALESCE(area_claimed, 0) ELSE 0 END), 0)"
            .to_string(),
    ]
    .join(", ")
}

fn read_counts(row: &Row<'_>, offset: usize) -> rusqlite::Result<RawCounts> {
    let n = |i: usize| -> rusqlite::Result<u64> {
        Ok(u64::try_from(row.get::<_, i64>(offset + i)?).unwrap_or(0))
    };
    Ok(RawCounts {
        total: n(0)?,
        granted: n(1)?,
        pending: n(2)?,
        rejected: n(3)?,
        under_review: n(4)?,
        ifr: n(5)?,
        cr: n(6)?,
        cfr: n(7)?,
        total_area: row.get(offset + 8)?,
        granted_area: row.get(offset + 9)?,
    })
}

fn grouped_rollups(
    conn: &Connection,
    group_column: &str,
    predicate: &Predicate,
) -> Result<Vec<(String, ClaimRollup)>, QueryError> {
    let sql = format!(
        "SELECT {group_column}, {} FROM claims{} GROUP BY {group_column} ORDER BY {group_column}",
        rollup_select(),
        predicate.where_clause()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(predicate.params().iter()), |row| {
            Ok((row.get::<_, String>(0)?, read_counts(row, 1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows
        .into_iter()
        .map(|(key, counts)| (key, ClaimRollup::from_counts(counts)))
        .collect())
}

fn single_rollup(conn: &Connection, predicate: &Predicate) -> Result<ClaimRollup, QueryError> {
    let sql = format!(
        "SELECT {} FROM claims{}",
        rollup_select(),
        predicate.where_clause()
    );
    let counts = conn.query_row(&sql, params_from_iter(predicate.params().iter()), |row| {
        read_counts(row, 0)
    })?;
    Ok(ClaimRollup::from_counts(counts))
}

/// One rollup per state, ordered by state name.
pub fn state_rollups(conn: &Connection) -> Result<Vec<ClaimRollup>, QueryError> {
    Ok(grouped_rollups(conn, "state", &Predicate::default())?
        .into_iter()
        .map(|(state, mut rollup)| {
            rollup.state = Some(state);
            rollup
        })
        .collect())
}

pub fn district_rollups(conn: &Connection, state: &str) -> Result<Vec<ClaimRollup>, QueryError> {
    let state = normalize_location(state);
    let mut predicate = Predicate::default();
    predicate.equals("state", state.clone());
    Ok(grouped_rollups(conn, "district", &predicate)?
        .into_iter()
        .map(|(district, mut rollup)| {
            rollup.state = Some(state.clone());
            rollup.district = Some(district);
            rollup
        })
        .collect())
}

/// Summary for one district. A district with no claims yields all zeros.
pub fn district_summary(
    conn: &Connection,
    state: &str,
    district: &str,
) -> Result<ClaimRollup, QueryError> {
    let state = normalize_location(state);
    let district = normalize_location(district);
    let mut predicate = Predicate::default();
    predicate.equals("state", state.clone()).equals("district", district.clone());
    let mut rollup = single_rollup(conn, &predicate)?;
    rollup.state = Some(state);
    rollup.district = Some(district);
    Ok(rollup)
}

pub fn village_claim_rollup(conn: &Connection, village_name: &str) -> Result<ClaimRollup, QueryError> {
    let mut predicate = Predicate::default();
    predicate.equals("village_name", normalize_location(village_name));
    let mut rollup = single_rollup(conn, &predicate)?;
    rollup.village_name = Some(normalize_location(village_name));
    Ok(rollup)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub totals: BTreeMap<String, u64>,
    pub claims_by_status: BTreeMap<String, u64>,
    pub claims_by_type: BTreeMap<String, u64>,
    pub documents_by_status: BTreeMap<String, u64>,
    pub tickets_by_status: BTreeMap<String, u64>,
}

pub fn admin_stats(conn: &Connection) -> Result<AdminStats, QueryError> {
    let mut totals = BTreeMap::new();
    for table in TABLES {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        totals.insert(table.to_string(), u64::try_from(n).unwrap_or(0));
    }
    let all = Predicate::default();
    Ok(AdminStats {
        totals,
        claims_by_status: count_by(
            conn,
            "claims",
            "status",
            &all,
            ClaimStatus::ALL.iter().map(|s| s.as_str()),
        )?,
        claims_by_type: count_by(
            conn,
            "claims",
            "claim_type",
            &all,
            ClaimType::ALL.iter().map(|t| t.as_str()),
        )?,
        documents_by_status: count_by(
            conn,
            "documents",
            "status",
            &all,
            DocumentStatus::ALL.iter().map(|s| s.as_str()),
        )?,
        tickets_by_status: count_by(
            conn,
            "support_tickets",
            "status",
            &all,
            TicketStatus::ALL.iter().map(|s| s.as_str()),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1.0, 3.0), 33.3);
        assert_eq!(percentage(2.0, 3.0), 66.7);
        assert_eq!(percentage(5.0, 5.0), 100.0);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn empty_rollup_has_zero_percentages() {
        let rollup = ClaimRollup::from_counts(RawCounts::default());
        assert_eq!(rollup.granted_percentage, 0.0);
        assert_eq!(rollup.pending_percentage, 0.0);
        assert_eq!(rollup.rejected_percentage, 0.0);
        assert_eq!(rollup.under_review_percentage, 0.0);
    }

    proptest! {
        #[test]
        fn percentage_is_finite_and_bounded(value in 0u64..10_000, extra in 0u64..10_000) {
            let total = value + extra;
            let p = percentage(value as f64, total as f64);
            prop_assert!(p.is_finite());
            prop_assert!((0.0..=100.0).contains(&p));
            if total == 0 {
                prop_assert_eq!(p, 0.0);
            }
        }
    }
}
