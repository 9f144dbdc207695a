// SPDX-License-Identifier: Apache-2.0

use super::RecommendationContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub priority: Priority,
    pub match_score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParseFailure(pub String);

fn fail(reason: impl Into<String>) -> ParseFailure {
    ParseFailure(reason.into())
}

#[must_use]
pub fn build_prompt(ctx: &RecommendationContext) -> String {
    let village = &ctx.village;
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Recommend government schemes for the village {} ({} district, {}).",
        village.village_name, village.district, village.state
    );
    let _ = writeln!(
        prompt,
        "Population {}, tribal population {}, total area {:.2} ha, forest area {:.2} ha.",
        village.population,
        village.tribal_population,
        village.total_area_hectares,
        village.forest_area_hectares
    );
    let _ = writeln!(prompt, "Mapped assets:");
    for (asset_type, totals) in &ctx.assets.by_type {
        let _ = writeln!(
            prompt,
            "- {asset_type}: {} ({:.2} ha)",
            totals.count, totals.area_hectares
        );
    }
    let claims = &ctx.claims;
    let _ = writeln!(
        prompt,
        "FRA claims: {} total, {} granted, {} pending, {} rejected, {} under review; {:.2} ha claimed.",
        claims.total_claims,
        claims.granted_claims,
        claims.pending_claims,
        claims.rejected_claims,
        claims.under_review_claims,
        claims.total_area_claimed
    );
    let _ = writeln!(prompt, "Active schemes:");
    for scheme in &ctx.schemes {
        let _ = writeln!(
            prompt,
            "- {}: {}",
            scheme.scheme_name,
            scheme.description.as_deref().unwrap_or("")
        );
    }
    prompt.push_str(
        "Reply with a JSON object only, shaped as \
         {\"recommendations\":[{\"name\":string,\"priority\":\"high\"|\"medium\"|\"low\",\
         \"match_score\":number 0-100,\"reasons\":[string]}]}.",
    );
    prompt
}

/// Drops a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_item(index: usize, item: &Value) -> Result<Recommendation, ParseFailure> {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| fail(format!("recommendations[{index}].name missing or empty")))?;
    let priority = item
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::parse)
        .ok_or_else(|| fail(format!("recommendations[{index}].priority invalid")))?;
    let match_score = item
        .get("match_score")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .ok_or_else(|| fail(format!("recommendations[{index}].match_score not a number")))?
        .clamp(0.0, 100.0);
    let reasons = item
        .get("reasons")
        .and_then(Value::as_array)
        .ok_or_else(|| fail(format!("recommendations[{index}].reasons not an array")))?
        .iter()
        .map(|r| r.as_str().map(ToString::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| fail(format!("recommendations[{index}].reasons must be strings")))?;
    Ok(Recommendation {
        name: name.to_string(),
        priority,
        match_score,
        reasons,
    })
}

pub fn parse_recommendations(reply: &str) -> Result<Vec<Recommendation>, ParseFailure> {
    let body = strip_code_fences(reply);
    let object = outermost_object(body).ok_or_else(|| fail("no JSON object in reply"))?;
    let value: Value =
        serde_json::from_str(object).map_err(|e| fail(format!("reply is not JSON: {e}")))?;
    let items = value
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or_else(|| fail("recommendations array missing"))?;
    if items.is_empty() {
        return Err(fail("recommendations array empty"));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_item(i, item))
        .collect()
}

fn fallback_item(name: &str, priority: Priority, match_score: f64, reasons: &[&str]) -> Recommendation {
    Recommendation {
        name: name.to_string(),
        priority,
        match_score,
        reasons: reasons.iter().map(ToString::to_string).collect(),
    }
}

/// Fixed list returned whenever the completion path fails.
#[must_use]
pub fn fallback_recommendations() -> Vec<Recommendation> {
    vec![
        fallback_item(
            "PM-KISAN",
            Priority::High,
            85.0,
            &["Income support for landholding farmer families", "FRA patta holders are eligible"],
        ),
        fallback_item(
            "Jal Jeevan Mission",
            Priority::High,
            80.0,
            &["Functional household tap connections", "Targets rural and tribal habitations"],
        ),
        fallback_item(
            "MGNREGA",
            Priority::Medium,
            75.0,
            &["Guaranteed wage employment", "Works can develop forest and water assets"],
        ),
        fallback_item(
            "PMAY-G",
            Priority::Medium,
            70.0,
            &["Pucca housing assistance for rural households"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{"recommendations":[{"name":"Van Dhan Yojana","priority":"High","match_score":140,"reasons":["forest produce"]}]}"#;

    #[test]
    fn parses_plain_and_fenced_replies() {
        let plain = parse_recommendations(REPLY).expect("plain");
        assert_eq!(plain[0].name, "Van Dhan Yojana");
        assert_eq!(plain[0].priority, Priority::High);
        assert!((plain[0].match_score - 100.0).abs() < f64::EPSILON);

        let fenced = format!("```json\n{REPLY}\n```");
        assert_eq!(parse_recommendations(&fenced).expect("fenced"), plain);

        let chatty = format!("Here you go:\n{REPLY}\nHope this helps.");
        assert_eq!(parse_recommendations(&chatty).expect("chatty"), plain);
    }

    #[test]
    fn parses_single_line_fenced_reply() {
        let plain = parse_recommendations(REPLY).expect("plain");
        let inline = format!("```json {REPLY}```");
        assert_eq!(parse_recommendations(&inline).expect("inline fence"), plain);
        let bare = format!("```{REPLY}```");
        assert_eq!(parse_recommendations(&bare).expect("bare fence"), plain);
    }

    #[test]
    fn parse_failures_are_std_errors() {
        let err: Box<dyn std::error::Error> =
            Box::new(parse_recommendations("not json at all").expect_err("rejected"));
        assert_eq!(err.to_string(), "no JSON object in reply");
    }

    #[test]
    fn rejects_malformed_replies() {
        for reply in [
            "not json at all",
            "{\"recommendations\": []}",
            "{\"items\": [1]}",
            r#"{"recommendations":[{"name":"","priority":"high","match_score":1,"reasons":[]}]}"#,
            r#"{"recommendations":[{"name":"x","priority":"urgent","match_score":1,"reasons":[]}]}"#,
            r#"{"recommendations":[{"name":"x","priority":"low","match_score":"90","reasons":[]}]}"#,
            r#"{"recommendations":[{"name":"x","priority":"low","match_score":9,"reasons":[1]}]}"#,
        ] {
            assert!(parse_recommendations(reply).is_err(), "accepted: {reply}");
        }
    }

    #[test]
    fn negative_scores_clamp_to_zero() {
        let reply = r#"{"recommendations":[{"name":"x","priority":"low","match_score":-3,"reasons":[]}]}"#;
        let parsed = parse_recommendations(reply).expect("parsed");
        assert!(parsed[0].match_score.abs() < f64::EPSILON);
    }

    #[test]
    fn fallback_list_is_stable_and_non_empty() {
        let names: Vec<String> = fallback_recommendations().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["PM-KISAN", "Jal Jeevan Mission", "MGNREGA", "PMAY-G"]);
    }
}
