// SPDX-License-Identifier: Apache-2.0

//! Scheme recommendations for a village: one completion call, strict reply
//! validation, and a fixed fallback list when anything goes wrong.

pub mod fake;
mod parse;
mod provider;

pub use parse::{
    build_prompt, fallback_recommendations, parse_recommendations, ParseFailure, Priority,
    Recommendation,
};
pub use provider::{CompletionProvider, HttpCompletionProvider, ProviderError};

use fra_atlas_model::{Scheme, Village};
use fra_atlas_query::{
    active_schemes, assets_for_village_name, get_village, village_claim_rollup, AssetSummary,
    ClaimRollup, QueryError,
};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

/// Everything the prompt is built from.
#[derive(Debug, Clone)]
pub struct RecommendationContext {
    pub village: Village,
    pub assets: AssetSummary,
    pub claims: ClaimRollup,
    pub schemes: Vec<Scheme>,
}

/// Returns `None` for an unknown village id.
pub fn gather_context(
    conn: &Connection,
    village_id: i64,
) -> Result<Option<RecommendationContext>, QueryError> {
    let Some(village) = get_village(conn, village_id)? else {
        return Ok(None);
    };
    let assets = assets_for_village_name(conn, &village.village_name)?;
    let claims = village_claim_rollup(conn, &village.village_name)?;
    Ok(Some(RecommendationContext {
        assets: AssetSummary::from_assets(&assets),
        claims,
        schemes: active_schemes(conn)?,
        village,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationOutcome {
    pub source: RecommendationSource,
    pub recommendations: Vec<Recommendation>,
}

/// Never fails: provider and parse errors are logged and replaced by the fallback list.
pub async fn recommend(
    provider: &dyn CompletionProvider,
    ctx: &RecommendationContext,
) -> RecommendationOutcome {
    let prompt = build_prompt(ctx);
    let reason = match provider.complete(&prompt).await {
        Ok(reply) => match parse_recommendations(&reply) {
            Ok(recommendations) => {
                info!(
                    village_id = ctx.village.id,
                    count = recommendations.len(),
                    "recommendations generated"
                );
                return RecommendationOutcome {
                    source: RecommendationSource::Ai,
                    recommendations,
                };
            }
            Err(err) => err.to_string(),
        },
        Err(err) => err.to_string(),
    };
    warn!(village_id = ctx.village.id, reason = %reason, "using fallback recommendations");
    RecommendationOutcome {
        source: RecommendationSource::Fallback,
        recommendations: fallback_recommendations(),
    }
}
