// SPDX-License-Identifier: Apache-2.0

use crate::API_ERROR_CODES;
use fra_atlas_query::{ClaimFilter, DocumentFilter, TicketFilter};
use serde_json::{json, Map, Value};

fn query_params(keys: &[&str], paged: bool) -> Value {
    let mut params: Vec<Value> = keys
        .iter()
        .map(|k| json!({"name": k, "in": "query", "schema": {"type": "string"}}))
        .collect();
    if paged {
        params.push(json!({"name": "page", "in": "query", "schema": {"type": "integer", "minimum": 1}}));
        params.push(json!({"name": "limit", "in": "query", "schema": {"type": "integer", "minimum": 1}}));
    }
    Value::Array(params)
}

fn path_params(names: &[&str]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|n| json!({"name": n, "in": "path", "required": true, "schema": {"type": "string"}}))
            .collect(),
    )
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorEnvelope"}}}
    })
}

fn op(summary: &str, params: Value, extra: &[(&str, &str)]) -> Value {
    let mut responses = Map::new();
    responses.insert("200".to_string(), json!({"description": summary}));
    for (status, description) in extra {
        responses.insert((*status).to_string(), error_response(description));
    }
    json!({"summary": summary, "parameters": params, "responses": responses})
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let none = || Value::Array(Vec::new());
    let bad = ("400", "invalid request");
    let missing = ("404", "not found");
    let codes: Vec<Value> = API_ERROR_CODES
        .iter()
        .map(|c| json!(format!("{c:?}")))
        .collect();
    json!({
      "openapi": "3.0.3",
      "info": {"title": "FRA Atlas API", "version": "v1"},
      "paths": {
        "/healthz": {"get": op("liveness", none(), &[])},
        "/api/claims": {
          "get": op("filtered, paginated claims with stats", query_params(ClaimFilter::KEYS, true), &[bad]),
          "post": op("create a claim", none(), &[bad, ("409", "claim_id already exists")])
        },
        "/api/claims/{state}": {
          "get": op("claims in a state", path_params(&["state"]), &[bad])
        },
        "/api/claims/{claim_id}/status": {
          "patch": op("set claim status", path_params(&["claim_id"]), &[bad, missing])
        },
        "/api/stats": {"get": op("per-state rollups", none(), &[])},
        "/api/stats/{state}": {"get": op("per-district rollups", path_params(&["state"]), &[])},
        "/api/stats/{state}/{district}": {
          "get": op("district summary", path_params(&["state", "district"]), &[])
        },
        "/api/villages": {"get": op("villages", query_params(&["state", "district"], false), &[bad])},
        "/api/villages/{id}/assets": {"get": op("village assets", path_params(&["id"]), &[bad, missing])},
        "/api/villages/{id}/enhanced": {"get": op("village profile", path_params(&["id"]), &[bad, missing])},
        "/api/patta-holders/{claim_id}": {"get": op("patta holders of a claim", path_params(&["claim_id"]), &[missing])},
        "/api/patta-holders/state/{state}": {"get": op("patta holders of a state", path_params(&["state"]), &[])},
        "/api/patta-holders-coordinates": {
          "get": op("patta holders with coordinates", query_params(&["state"], false), &[bad])
        },
        "/api/land-parcels/{claim_id}": {
          "get": op("land parcels of a claim", path_params(&["claim_id"]), &[missing])
        },
        "/api/village-boundaries": {
          "get": op("GeoJSON FeatureCollection under data", query_params(&["state"], false), &[bad])
        },
        "/api/admin/stats": {"get": op("global counts", none(), &[])},
        "/api/admin/health": {"get": op("store round trip", none(), &[("503", "store unavailable")])},
        "/api/decision-support/recommendations/{village_id}": {
          "post": op("scheme recommendations", path_params(&["village_id"]), &[bad, missing])
        },
        "/api/decision-support/schemes": {"get": op("active schemes", none(), &[])},
        "/api/documents": {
          "get": op("filtered, paginated documents", query_params(DocumentFilter::KEYS, true), &[bad]),
          "post": op("create a document record", none(), &[bad])
        },
        "/api/documents/{id}": {
          "get": op("document", path_params(&["id"]), &[missing]),
          "patch": op("update document", path_params(&["id"]), &[bad, missing]),
          "delete": op("delete document", path_params(&["id"]), &[missing])
        },
        "/api/support-tickets": {
          "get": op("filtered, paginated tickets", query_params(TicketFilter::KEYS, true), &[bad]),
          "post": op("create a ticket", none(), &[bad])
        },
        "/api/support-tickets/{id}": {
          "get": op("ticket", path_params(&["id"]), &[missing]),
          "patch": op("update ticket", path_params(&["id"]), &[bad, missing]),
          "delete": op("delete ticket", path_params(&["id"]), &[missing])
        },
        "/api/openapi.json": {"get": op("this document", none(), &[])}
      },
      "components": {
        "schemas": {
          "ApiErrorCode": {"type": "string", "enum": codes},
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "message": {"type": "string"},
              "details": {"type": "object"}
            }
          },
          "ErrorEnvelope": {
            "type": "object",
            "required": ["success", "message", "error"],
            "properties": {
              "success": {"type": "boolean"},
              "message": {"type": "string"},
              "error": {"$ref": "#/components/schemas/ApiError"}
            }
          }
        }
      }
    })
}
