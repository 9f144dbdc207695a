// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Read side of FRA Atlas: typed filters, paginated lists with per-category
//! stats, geographic rollups, GeoJSON boundary export and entity lookups.
//!
//! Every function takes a borrowed `rusqlite::Connection`; callers decide
//! where the blocking work runs.

mod aggregate;
mod filters;
mod geojson;
mod list;
mod lookup;
mod page;
mod query_error;

pub use aggregate::{
    admin_stats, district_rollups, district_summary, percentage, state_rollups,
    village_claim_rollup, AdminStats, ClaimRollup,
};
pub use filters::{
    escape_like, filter_value, ClaimFilter, DocumentFilter, Predicate, TicketFilter, VillageFilter,
};
pub use geojson::{boundaries_geojson, boundary_feature, feature_collection};
pub use list::{
    list_claims, list_documents, list_tickets, ClaimStats, DocumentStats, Page, TicketStats,
};
pub use lookup::{
    active_schemes, assets_for_village_name, get_village, land_parcels_by_claim, list_villages,
    patta_holders_by_claim, patta_holders_by_state, patta_holders_with_coordinates,
    store_health, village_assets, village_enhanced, AssetSummary, AssetTotals, EnhancedVillage,
    PattaHolderPoint, StoreHealth, VillageAssets,
};
pub use page::{page_count, PageLimits, PageRequest, Pagination};
pub use query_error::{QueryError, QueryErrorCode};

pub const CRATE_NAME: &str = "fra-atlas-query";
