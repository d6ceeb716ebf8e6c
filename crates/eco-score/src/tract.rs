//! Tracts: the grid cells scored and projected for a map viewport.

use eco_common::{BoundingBox, EcoError, EcoResult, Location, ScoreCategory};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::source::SourceKind;
use crate::trend::Prediction;

/// Upper bound on the cells a single grid may contain.
pub const MAX_GRID_TRACTS: usize = 100_000;

/// Values accumulated on a tract as each pipeline stage runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TractProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greenspace: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco_percentile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

/// A rectangular cell standing in for a census tract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tract {
    pub id: String,
    pub bounds: BoundingBox,
    pub centroid: Location,
    #[serde(default)]
    pub properties: TractProperties,
}

impl Tract {
    /// A tract covering `bounds`, centred on the middle of the box.
    pub fn new(id: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            id: id.into(),
            bounds,
            centroid: bounds.center(),
            properties: TractProperties::default(),
        }
    }

    /// A tract with an explicit centroid (irregular polygons whose centroid
    /// is not the middle of their bounding box).
    pub fn with_centroid(id: impl Into<String>, bounds: BoundingBox, centroid: Location) -> Self {
        Self {
            id: id.into(),
            bounds,
            centroid,
            properties: TractProperties::default(),
        }
    }

    /// Display category of the eco score, once scored.
    pub fn category(&self) -> Option<ScoreCategory> {
        self.properties.eco_score.map(ScoreCategory::from_score)
    }

    /// GeoJSON Feature with the tract polygon and its properties.
    pub fn to_feature(&self) -> Value {
        let mut properties = serde_json::to_value(&self.properties).unwrap_or_else(|_| json!({}));
        if let (Value::Object(map), Some(category)) = (&mut properties, self.category()) {
            map.insert("category".to_string(), json!(category.label()));
            map.insert("color".to_string(), json!(category.color().to_hex()));
        }

        json!({
            "type": "Feature",
            "id": self.id,
            "geometry": {
                "type": "Polygon",
                "coordinates": [self.bounds.ring()],
            },
            "properties": properties,
        })
    }
}

/// Split `bbox` into `rows` x `cols` equal tracts.
///
/// Row 0 is the northernmost row; ids are `tract-{row}-{col}`.
pub fn generate_grid(bbox: &BoundingBox, rows: usize, cols: usize) -> EcoResult<Vec<Tract>> {
    bbox.validate()?;
    if rows == 0 || cols == 0 {
        return Err(EcoError::invalid_parameter(
            "grid",
            format!("rows and cols must be positive, got {}x{}", rows, cols),
        ));
    }
    if rows.saturating_mul(cols) > MAX_GRID_TRACTS {
        return Err(EcoError::invalid_parameter(
            "grid",
            format!("{}x{} exceeds {} tracts", rows, cols, MAX_GRID_TRACTS),
        ));
    }

    let cell_w = bbox.width() / cols as f64;
    let cell_h = bbox.height() / rows as f64;

    let mut tracts = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let max_lat = bbox.max_lat - row as f64 * cell_h;
        let min_lat = if row + 1 == rows { bbox.min_lat } else { max_lat - cell_h };
        for col in 0..cols {
            let min_lon = bbox.min_lon + col as f64 * cell_w;
            let max_lon = if col + 1 == cols { bbox.max_lon } else { min_lon + cell_w };
            tracts.push(Tract::new(
                format!("tract-{}-{}", row, col),
                BoundingBox::new(min_lon, min_lat, max_lon, max_lat),
            ));
        }
    }

    tracing::debug!(rows, cols, count = tracts.len(), "generated tract grid");
    Ok(tracts)
}

/// GeoJSON FeatureCollection for the rendering layer.
pub fn to_feature_collection(tracts: &[Tract]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": tracts.iter().map(Tract::to_feature).collect::<Vec<_>>(),
    })
}
