// SPDX-License-Identifier: Apache-2.0

use crate::filters::{ClaimFilter, DocumentFilter, Predicate, TicketFilter};
use crate::page::{PageRequest, Pagination};
use crate::QueryError;
use fra_atlas_model::{
    Claim, ClaimStatus, ClaimType, Document, DocumentStatus, SupportTicket, TicketPriority,
    TicketStatus,
};
use fra_atlas_store::rows::{
    decode_claim, decode_document, decode_ticket, CLAIM_COLUMNS, DOCUMENT_COLUMNS, TICKET_COLUMNS,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T, S> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub stats: S,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimStats {
    pub by_status: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
    pub total_area: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub by_status: BTreeMap<String, u64>,
    pub by_priority: BTreeMap<String, u64>,
}

/// Counts rows per value of `column`, listing every known value even when zero.
pub(crate) fn count_by(
    conn: &Connection,
    table: &str,
    column: &str,
    predicate: &Predicate,
    known: impl IntoIterator<Item = &'static str>,
) -> Result<BTreeMap<String, u64>, QueryError> {
    let mut out: BTreeMap<String, u64> = known.into_iter().map(|k| (k.to_string(), 0)).collect();
    let sql = format!(
        "SELECT {column}, COUNT(*) FROM {table}{} GROUP BY {column}",
        predicate.where_clause()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params_from_iter(predicate.params().iter()), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (key, count) = row?;
        *out.entry(key).or_insert(0) += u64::try_from(count).unwrap_or(0);
    }
    Ok(out)
}

fn fetch_page<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    order_by: &str,
    predicate: &Predicate,
    page: PageRequest,
    decode: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<(Vec<T>, Pagination), QueryError> {
    let where_clause = predicate.where_clause();
    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table}{where_clause}"),
        params_from_iter(predicate.params().iter()),
        |row| row.get(0),
    )?;
    let total = u64::try_from(total).unwrap_or(0);

    let sql = format!(
        "SELECT {columns} FROM {table}{where_clause} ORDER BY {order_by} LIMIT ? OFFSET ?"
    );
    let mut params: Vec<Value> = predicate.params().to_vec();
    params.push(Value::Integer(i64::from(page.limit)));
    params.push(Value::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
    let mut stmt = conn.prepare_cached(&sql)?;
    let data = stmt
        .query_map(params_from_iter(params.iter()), decode)?
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        table,
        filters = predicate.params().len(),
        page = page.page,
        limit = page.limit,
        total,
        returned = data.len(),
        "page fetched"
    );
    Ok((data, Pagination::new(page, total)))
}

pub fn list_claims(
    conn: &Connection,
    filter: &ClaimFilter,
    page: PageRequest,
) -> Result<Page<Claim, ClaimStats>, QueryError> {
    let predicate = filter.predicate();
    let (data, pagination) = fetch_page(
        conn,
        "claims",
        CLAIM_COLUMNS,
        "created_at DESC, id DESC",
        &predicate,
        page,
        decode_claim,
    )?;
    let total_area: f64 = conn.query_row(
        &format!(
            "SELECT COALESCE(SUM(area_claimed), 0) FROM claims{}",
            predicate.where_clause()
        ),
        params_from_iter(predicate.params().iter()),
        |row| row.get(0),
    )?;
    let stats = ClaimStats {
        by_status: count_by(
            conn,
            "claims",
            "status",
            &predicate,
            ClaimStatus::ALL.iter().map(|s| s.as_str()),
        )?,
        by_type: count_by(
            conn,
            "claims",
            "claim_type",
            &predicate,
            ClaimType::ALL.iter().map(|t| t.as_str()),
        )?,
        total_area,
    };
    Ok(Page {
        data,
        pagination,
        stats,
    })
}

pub fn list_documents(
    conn: &Connection,
    filter: &DocumentFilter,
    page: PageRequest,
) -> Result<Page<Document, DocumentStats>, QueryError> {
    let predicate = filter.predicate();
    let (data, pagination) = fetch_page(
        conn,
        "documents",
        DOCUMENT_COLUMNS,
        "uploaded_at DESC, id DESC",
        &predicate,
        page,
        decode_document,
    )?;
    let stats = DocumentStats {
        by_status: count_by(
            conn,
            "documents",
            "status",
            &predicate,
            DocumentStatus::ALL.iter().map(|s| s.as_str()),
        )?,
    };
    Ok(Page {
        data,
        pagination,
        stats,
    })
}

pub fn list_tickets(
    conn: &Connection,
    filter: &TicketFilter,
    page: PageRequest,
) -> Result<Page<SupportTicket, TicketStats>, QueryError> {
    let predicate = filter.predicate();
    let (data, pagination) = fetch_page(
        conn,
        "support_tickets",
        TICKET_COLUMNS,
        "created_at DESC, id DESC",
        &predicate,
        page,
        decode_ticket,
    )?;
    let stats = TicketStats {
        by_status: count_by(
            conn,
            "support_tickets",
            "status",
            &predicate,
            TicketStatus::ALL.iter().map(|s| s.as_str()),
        )?,
        by_priority: count_by(
            conn,
            "support_tickets",
            "priority",
            &predicate,
            TicketPriority::ALL.iter().map(|p| p.as_str()),
        )?,
    };
    Ok(Page {
        data,
        pagination,
        stats,
    })
}
