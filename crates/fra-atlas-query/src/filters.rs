// SPDX-License-Identifier: Apache-2.0

use fra_atlas_model::{
    normalize_location, ClaimStatus, ClaimType, DocumentStatus, TicketPriority, TicketStatus,
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Returns `None` for values that mean "no filter": empty or `all`.
#[must_use]
pub fn filter_value(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed)
    }
}

#[must_use]
pub fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// AND-joined predicate with positional parameters.
#[derive(Debug, Default, Clone)]
pub struct Predicate {
    parts: Vec<String>,
    params: Vec<Value>,
}

impl Predicate {
    pub fn equals(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.parts.push(format!("{column} = ?"));
        self.params.push(value.into());
        self
    }

    /// Case-insensitive substring match against any of `columns`.
    pub fn contains(&mut self, columns: &[&str], needle: &str) -> &mut Self {
        let pattern = format!("%{}%", escape_like(needle));
        let ors: Vec<String> = columns
            .iter()
            .map(|c| format!("{c} LIKE ? ESCAPE '!'"))
            .collect();
        self.parts.push(format!("({})", ors.join(" OR ")));
        for _ in columns {
            self.params.push(Value::Text(pattern.clone()));
        }
        self
    }

    #[must_use]
    pub fn where_clause(&self) -> String {
        if self.parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.parts.join(" AND "))
        }
    }

    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFilter {
    pub state: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
    pub status: Option<ClaimStatus>,
    pub claim_type: Option<ClaimType>,
    pub search: Option<String>,
}

impl ClaimFilter {
    pub const KEYS: &'static [&'static str] =
        &["state", "district", "village", "status", "claim_type", "search"];

    #[must_use]
    pub fn predicate(&self) -> Predicate {
        let mut p = Predicate::default();
        if let Some(state) = &self.state {
            p.equals("state", normalize_location(state));
        }
        if let Some(district) = &self.district {
            p.equals("district", normalize_location(district));
        }
        if let Some(village) = &self.village {
            p.contains(&["village_name"], &normalize_location(village));
        }
        if let Some(status) = self.status {
            p.equals("status", status.as_str().to_string());
        }
        if let Some(claim_type) = self.claim_type {
            p.equals("claim_type", claim_type.as_str().to_string());
        }
        if let Some(search) = &self.search {
            p.contains(&["applicant_name", "claim_id"], search.trim());
        }
        p
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub status: Option<DocumentStatus>,
    pub document_type: Option<String>,
    pub claim_id: Option<String>,
    pub search: Option<String>,
}

impl DocumentFilter {
    pub const KEYS: &'static [&'static str] = &["status", "document_type", "claim_id", "search"];

    #[must_use]
    pub fn predicate(&self) -> Predicate {
        let mut p = Predicate::default();
        if let Some(status) = self.status {
            p.equals("status", status.as_str().to_string());
        }
        if let Some(kind) = &self.document_type {
            p.equals("document_type", kind.trim().to_string());
        }
        if let Some(claim_id) = &self.claim_id {
            p.equals("claim_id", claim_id.trim().to_string());
        }
        if let Some(search) = &self.search {
            p.contains(&["document_name"], search.trim());
        }
        p
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl TicketFilter {
    pub const KEYS: &'static [&'static str] = &["status", "priority", "category", "search"];

    #[must_use]
    pub fn predicate(&self) -> Predicate {
        let mut p = Predicate::default();
        if let Some(status) = self.status {
            p.equals("status", status.as_str().to_string());
        }
        if let Some(priority) = self.priority {
            p.equals("priority", priority.as_str().to_string());
        }
        if let Some(category) = &self.category {
            p.equals("category", category.trim().to_string());
        }
        if let Some(search) = &self.search {
            p.contains(&["subject", "description", "ticket_number"], search.trim());
        }
        p
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageFilter {
    pub state: Option<String>,
    pub district: Option<String>,
}

impl VillageFilter {
    pub const KEYS: &'static [&'static str] = &["state", "district"];

    #[must_use]
    pub fn predicate(&self) -> Predicate {
        let mut p = Predicate::default();
        if let Some(state) = &self.state {
            p.equals("state", normalize_location(state));
        }
        if let Some(district) = &self.district {
            p.equals("district", normalize_location(district));
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_and_empty_values_are_ignored() {
        assert_eq!(filter_value("all"), None);
        assert_eq!(filter_value(" ALL "), None);
        assert_eq!(filter_value("   "), None);
        assert_eq!(filter_value(" Odisha "), Some("Odisha"));
    }

    #[test]
    fn claim_predicate_binds_values_instead_of_inlining_them() {
        let filter = ClaimFilter {
            state: Some("Odisha'; DROP TABLE claims; --".to_string()),
            search: Some("50%_off".to_string()),
            ..ClaimFilter::default()
        };
        let p = filter.predicate();
        let clause = p.where_clause();
        assert_eq!(
            clause,
            " WHERE state = ? AND (applicant_name LIKE ? ESCAPE '!' OR claim_id LIKE ? ESCAPE '!')"
        );
        assert_eq!(p.params().len(), 3);
        assert_eq!(p.params()[1], Value::Text("%50!%!_off%".to_string()));
    }

    #[test]
    fn chained_equality_predicates_are_and_joined() {
        let mut p = Predicate::default();
        p.equals("state", "Odisha".to_string()).equals("is_active", 1_i64);
        assert_eq!(p.where_clause(), " WHERE state = ? AND is_active = ?");
        assert_eq!(
            p.params(),
            &[Value::Text("Odisha".to_string()), Value::Integer(1)]
        );
    }

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert!(TicketFilter::default().predicate().where_clause().is_empty());
        assert!(DocumentFilter::default().predicate().params().is_empty());
    }
}
