// SPDX-License-Identifier: Apache-2.0

use crate::filters::Predicate;
use crate::QueryError;
use fra_atlas_model::{normalize_location, VillageBoundary};
use fra_atlas_store::rows::{decode_boundary, BOUNDARY_COLUMNS};
use rusqlite::{params_from_iter, Connection};
use serde_json::{json, Value};

#[must_use]
pub fn boundary_feature(boundary: &VillageBoundary) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "village_name": boundary.village_name,
            "district": boundary.district,
            "state": boundary.state,
            "area_sqkm": boundary.area_sqkm,
        },
        "geometry": boundary.geometry,
    })
}

#[must_use]
pub fn feature_collection(boundaries: &[VillageBoundary]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": boundaries.iter().map(boundary_feature).collect::<Vec<_>>(),
    })
}

/// Boundaries as a GeoJSON `FeatureCollection`, ordered by village name then id.
pub fn boundaries_geojson(conn: &Connection, state: Option<&str>) -> Result<Value, QueryError> {
    let mut predicate = Predicate::default();
    if let Some(state) = state {
        predicate.equals("state", normalize_location(state));
    }
    let sql = format!(
        "SELECT {BOUNDARY_COLUMNS} FROM village_boundaries{} ORDER BY village_name, id",
        predicate.where_clause()
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let boundaries = stmt
        .query_map(params_from_iter(predicate.params().iter()), decode_boundary)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(feature_collection(&boundaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_feature_list() {
        assert_eq!(
            feature_collection(&[]),
            json!({"type": "FeatureCollection", "features": []})
        );
    }

    #[test]
    fn feature_carries_properties_and_geometry() {
        let boundary = VillageBoundary {
            id: 1,
            village_name: "Jamguda".to_string(),
            district: "Kalahandi".to_string(),
            state: "Odisha".to_string(),
            area_sqkm: 8.2,
            geometry: json!({"type": "Point", "coordinates": [83.17, 19.91]}),
        };
        let feature = boundary_feature(&boundary);
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["properties"]["village_name"], "Jamguda");
        assert_eq!(feature["properties"]["area_sqkm"], 8.2);
        assert_eq!(feature["geometry"]["type"], "Point");
    }
}
