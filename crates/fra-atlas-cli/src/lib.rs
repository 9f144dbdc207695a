// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Operator commands for the FRA Atlas store: schema migration, demo seeding,
//! inspection and a claims listing that goes through the same query path as
//! the HTTP API.

use clap::{Args, Parser, Subcommand};
use fra_atlas_model::{ClaimStatus, ClaimType};
use fra_atlas_query::{list_claims, ClaimFilter, PageLimits, PageRequest};
use fra_atlas_store::{
    migrate, open_connection, schema_version, seed_demo, verify_schema, DbConfig, SCHEMA_VERSION,
    TABLES,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

pub const CRATE_NAME: &str = "fra-atlas-cli";

#[derive(Debug, Parser)]
#[command(name = "fra-atlas")]
#[command(about = "FRA Atlas store operations CLI")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "FRA_DB_PATH", default_value = "data/fra_atlas.sqlite")]
    pub db: PathBuf,
    /// Emit machine-readable JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Schema and seed management.
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
    /// Claim queries.
    Claims {
        #[command(subcommand)]
        command: ClaimsCommand,
    },
    /// Print the CLI version.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Create or upgrade the schema. Safe to run repeatedly.
    Migrate,
    /// Insert demo data into empty tables.
    Seed {
        /// Delete existing rows first.
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
    /// Report schema version and per-table row counts.
    Inspect,
}

#[derive(Debug, Subcommand)]
pub enum ClaimsCommand {
    List(ClaimListArgs),
}

#[derive(Debug, Args)]
pub struct ClaimListArgs {
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub village: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub claim_type: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
}

impl ClaimListArgs {
    fn filter(&self) -> Result<ClaimFilter, String> {
        let status = self
            .status
            .as_deref()
            .map(ClaimStatus::parse)
            .transpose()
            .map_err(|e| e.to_string())?;
        let claim_type = self
            .claim_type
            .as_deref()
            .map(ClaimType::parse)
            .transpose()
            .map_err(|e| e.to_string())?;
        Ok(ClaimFilter {
            state: self.state.clone(),
            district: self.district.clone(),
            village: self.village.clone(),
            status,
            claim_type,
            search: self.search.clone(),
        })
    }
}

fn connect(path: &std::path::Path) -> Result<Connection, String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("create {} failed: {e}", parent.display()))?;
        }
    }
    let cfg = DbConfig {
        path: path.to_path_buf(),
        ..DbConfig::default()
    };
    open_connection(&cfg).map_err(|e| format!("open {} failed: {e}", path.display()))
}

#[derive(Debug, Serialize)]
struct Inspection {
    path: String,
    schema_version: i64,
    expected_schema_version: i64,
    row_counts: BTreeMap<&'static str, i64>,
}

fn inspect(conn: &Connection, path: &std::path::Path) -> Result<Inspection, String> {
    let version = schema_version(conn).map_err(|e| e.to_string())?;
    let mut row_counts = BTreeMap::new();
    if version > 0 {
        for table in TABLES {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(|e| format!("count {table} failed: {e}"))?;
            row_counts.insert(table, count);
        }
    }
    Ok(Inspection {
        path: path.display().to_string(),
        schema_version: version,
        expected_schema_version: SCHEMA_VERSION,
        row_counts,
    })
}

fn render(json: bool, value: &Value, text: impl FnOnce() -> String) -> Result<String, String> {
    if json {
        serde_json::to_string_pretty(value).map_err(|e| e.to_string())
    } else {
        Ok(text())
    }
}

/// Runs one command and returns what should be printed on stdout.
pub fn execute(cli: &Cli) -> Result<String, String> {
    match &cli.command {
        Commands::Version => render(cli.json, &json!({"version": env!("CARGO_PKG_VERSION")}), || {
            format!("fra-atlas {}", env!("CARGO_PKG_VERSION"))
        }),
        Commands::Db { command } => {
            let mut conn = connect(&cli.db)?;
            match command {
                DbCommand::Migrate => {
                    let version = migrate(&mut conn).map_err(|e| e.to_string())?;
                    info!(db = %cli.db.display(), version, "migration complete");
                    render(cli.json, &json!({"schema_version": version}), || {
                        format!("schema version {version}")
                    })
                }
                DbCommand::Seed { reset } => {
                    verify_schema(&conn).map_err(|e| e.to_string())?;
                    let report = seed_demo(&mut conn, *reset).map_err(|e| e.to_string())?;
                    let value = serde_json::to_value(&report).map_err(|e| e.to_string())?;
                    render(cli.json, &value, || {
                        let mut out = String::new();
                        for (table, rows) in &report.inserted {
                            let _ = writeln!(out, "inserted {rows:>4} {table}");
                        }
                        for table in &report.skipped {
                            let _ = writeln!(out, "skipped       {table} (not empty)");
                        }
                        out.trim_end().to_string()
                    })
                }
                DbCommand::Inspect => {
                    let inspection = inspect(&conn, &cli.db)?;
                    let value = serde_json::to_value(&inspection).map_err(|e| e.to_string())?;
                    render(cli.json, &value, || {
                        let mut out = format!(
                            "{}\nschema version {} (expected {})",
                            inspection.path,
                            inspection.schema_version,
                            inspection.expected_schema_version
                        );
                        for (table, count) in &inspection.row_counts {
                            let _ = write!(out, "\n{table:<20} {count}");
                        }
                        out
                    })
                }
            }
        }
        Commands::Claims {
            command: ClaimsCommand::List(args),
        } => {
            let conn = connect(&cli.db)?;
            verify_schema(&conn).map_err(|e| e.to_string())?;
            let filter = args.filter()?;
            let page = PageRequest::new(Some(args.page), Some(args.limit), &PageLimits::default())
                .map_err(|e| e.to_string())?;
            let page = list_claims(&conn, &filter, page).map_err(|e| e.to_string())?;
            let value = json!({
                "data": page.data,
                "pagination": page.pagination,
                "stats": page.stats,
            });
            render(cli.json, &value, || {
                let mut out = String::new();
                for claim in &page.data {
                    let _ = writeln!(
                        out,
                        "{:<24} {:<12} {:<4} {:>8.2} ha  {} ({}, {})",
                        claim.claim_id,
                        claim.status,
                        claim.claim_type,
                        claim.area_claimed,
                        claim.applicant_name,
                        claim.village_name,
                        claim.state
                    );
                }
                let p = page.pagination;
                let _ = write!(out, "page {}/{} of {} claims", p.page, p.pages, p.total);
                out
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fra-atlas").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn migrate_seed_inspect_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("nested/atlas.sqlite");
        let db = db.to_str().expect("utf8 path");

        let out = execute(&cli(&["--db", db, "db", "migrate"])).expect("migrate");
        assert_eq!(out, format!("schema version {SCHEMA_VERSION}"));

        let out = execute(&cli(&["--db", db, "--json", "db", "seed"])).expect("seed");
        let report: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(report["inserted"]["claims"], 8);

        let out = execute(&cli(&["--db", db, "--json", "db", "seed"])).expect("seed again");
        let report: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(report["skipped"].as_array().map(Vec::len), Some(TABLES.len()));

        let out = execute(&cli(&["--db", db, "--json", "db", "inspect"])).expect("inspect");
        let inspection: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(inspection["schema_version"], SCHEMA_VERSION);
        assert_eq!(inspection["row_counts"]["claims"], 8);
        assert_eq!(inspection["row_counts"]["villages"], 4);
    }

    #[test]
    fn seed_requires_a_migrated_schema() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = dir.path().join("atlas.sqlite");
        let err = execute(&cli(&["--db", db.to_str().expect("utf8"), "db", "seed"]))
            .expect_err("unmigrated");
        assert!(err.contains("db migrate"), "{err}");
    }

    #[test]
    fn claims_list_validates_enum_filters() {
        let args = ClaimListArgs {
            state: None,
            district: None,
            village: None,
            status: Some("approved".to_string()),
            claim_type: None,
            search: None,
            page: 1,
            limit: 20,
        };
        assert!(args.filter().is_err());
    }
}
