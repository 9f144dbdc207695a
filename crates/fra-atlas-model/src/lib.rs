// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! FRA Atlas domain model.
//!
//! Claims, patta holders, land parcels, villages and their assets, schemes,
//! documents and support tickets. Everything here is plain data plus the
//! validation rules shared by the store, query and HTTP layers.

mod claim;
mod enums;
mod error;
mod records;

pub use claim::{
    generate_claim_id, generate_ticket_number, state_prefix, unix_millis, validate_claim_id, Claim,
    NewClaim, CLAIM_ID_MAX_LEN, NAME_MAX_LEN,
};
pub use enums::{
    AssetType, ClaimStatus, ClaimType, DemarcationStatus, DocumentStatus, TicketPriority,
    TicketStatus, VerificationStatus,
};
pub use error::ValidationError;
pub use records::{
    Document, DocumentUpdate, LandParcel, NewDocument, NewSupportTicket, PattaHolder, Scheme,
    SupportTicket, TicketUpdate, Village, VillageAsset, VillageBoundary,
};

pub const CRATE_NAME: &str = "fra-atlas-model";

/// Normalizes a denormalized location key (village, district, state name).
///
/// Location names are the join key between claims, assets and boundaries, so
/// every writer trims them the same way.
#[must_use]
pub fn normalize_location(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
