//! Observed band source backed by an in-memory scene.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use eco_common::{BoundingBox, EcoError, EcoResult, Location};
use serde::{Deserialize, Serialize};

use super::{DataSource, SourceKind, SourcedBands};
use crate::bands::BandSample;

/// One acquisition of five co-registered band rasters.
///
/// Rasters are row-major, top-to-bottom (row 0 is `bbox.max_lat`), with
/// values on the 0-10000 reflectance scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterScene {
    pub name: String,
    pub bbox: BoundingBox,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub acquired: Option<NaiveDate>,
    #[serde(default = "default_fill_value")]
    pub fill_value: f64,
    pub blue: Vec<f64>,
    pub green: Vec<f64>,
    pub red: Vec<f64>,
    pub nir: Vec<f64>,
    pub swir: Vec<f64>,
}

fn default_fill_value() -> f64 {
    -9999.0
}

impl RasterScene {
    /// Parse a scene from JSON and validate it.
    pub fn from_json(json: &str) -> EcoResult<Self> {
        let scene: RasterScene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> EcoResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EcoError::DataReadError(format!("failed to read scene {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> EcoResult<()> {
        self.bbox.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(EcoError::invalid_parameter(
                "scene",
                format!("{}: raster dimensions must be positive", self.name),
            ));
        }
        let expected = self.width * self.height;
        for (band, values) in [
            ("blue", &self.blue),
            ("green", &self.green),
            ("red", &self.red),
            ("nir", &self.nir),
            ("swir", &self.swir),
        ] {
            if values.len() != expected {
                return Err(EcoError::invalid_parameter(
                    "scene",
                    format!(
                        "{}: band {} has {} values, expected {}x{}={}",
                        self.name,
                        band,
                        values.len(),
                        self.width,
                        self.height,
                        expected
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Resolution in degrees per pixel (lon, lat).
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.bbox.width() / self.width as f64,
            self.bbox.height() / self.height as f64,
        )
    }

    /// Pixel containing a location, or `None` outside the scene.
    pub fn pixel_at(&self, location: &Location) -> Option<(usize, usize)> {
        if self.width == 0 || self.height == 0 || !self.bbox.contains_location(location) {
            return None;
        }
        let (res_x, res_y) = self.resolution();
        let col = ((location.lon - self.bbox.min_lon) / res_x).floor() as usize;
        let row = ((self.bbox.max_lat - location.lat) / res_y).floor() as usize;
        // The max edges are inclusive and land one past the last pixel.
        Some((col.min(self.width - 1), row.min(self.height - 1)))
    }

    /// Nearest-neighbour sample, or `None` outside the scene or on fill values.
    pub fn sample(&self, location: &Location) -> Option<BandSample> {
        let (col, row) = self.pixel_at(location)?;
        let idx = row * self.width + col;
        let sample = BandSample {
            blue: *self.blue.get(idx)?,
            green: *self.green.get(idx)?,
            red: *self.red.get(idx)?,
            nir: *self.nir.get(idx)?,
            swir: *self.swir.get(idx)?,
        };
        let is_fill = [sample.blue, sample.green, sample.red, sample.nir, sample.swir]
            .iter()
            .any(|v| *v == self.fill_value);
        if is_fill || !sample.is_valid() {
            return None;
        }
        Some(sample)
    }
}

/// A real-data source answering from a single loaded scene.
#[derive(Debug, Clone)]
pub struct RasterSource {
    scene: RasterScene,
    date_tolerance_days: i64,
}

impl RasterSource {
    pub fn new(scene: RasterScene) -> Self {
        Self {
            scene,
            date_tolerance_days: 0,
        }
    }

    /// Accept requests up to `days` away from the acquisition date.
    pub fn with_date_tolerance(mut self, days: i64) -> Self {
        self.date_tolerance_days = days.max(0);
        self
    }

    pub fn scene(&self) -> &RasterScene {
        &self.scene
    }

    fn date_matches(&self, requested: Option<NaiveDate>) -> bool {
        match (requested, self.scene.acquired) {
            (Some(requested), Some(acquired)) => {
                (requested - acquired).num_days().abs() <= self.date_tolerance_days
            }
            _ => true,
        }
    }
}

#[async_trait]
impl DataSource for RasterSource {
    fn name(&self) -> &str {
        &self.scene.name
    }

    async fn fetch_bands(
        &self,
        location: &Location,
        date: Option<NaiveDate>,
    ) -> EcoResult<SourcedBands> {
        location.validate()?;

        if !self.date_matches(date) {
            return Err(EcoError::DataNotAvailable(format!(
                "scene {} acquired {:?}, requested {:?}",
                self.scene.name, self.scene.acquired, date
            )));
        }

        let bands = self.scene.sample(location).ok_or_else(|| {
            EcoError::DataNotAvailable(format!(
                "scene {} has no valid pixel at {}",
                self.scene.name, location
            ))
        })?;

        Ok(SourcedBands {
            bands,
            source: SourceKind::Real,
            provider: self.scene.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_2x2() -> RasterScene {
        RasterScene {
            name: "test-scene".to_string(),
            bbox: BoundingBox::new(0.0, 0.0, 2.0, 2.0),
            width: 2,
            height: 2,
            acquired: NaiveDate::from_ymd_opt(2024, 7, 1),
            fill_value: -9999.0,
            blue: vec![800.0, 810.0, 820.0, 830.0],
            green: vec![1000.0, 1010.0, 1020.0, -9999.0],
            red: vec![1500.0, 1510.0, 1520.0, 1530.0],
            nir: vec![2250.0, 2260.0, 2270.0, 2280.0],
            swir: vec![1700.0, 1710.0, 1720.0, 1730.0],
        }
    }

    #[test]
    fn test_pixel_lookup_top_to_bottom() {
        let scene = scene_2x2();
        // North-west pixel is index 0.
        assert_eq!(scene.pixel_at(&Location { lat: 1.5, lon: 0.5 }), Some((0, 0)));
        // South-west pixel is row 1.
        assert_eq!(scene.pixel_at(&Location { lat: 0.5, lon: 0.5 }), Some((0, 1)));
        // Inclusive max edge maps to the last pixel.
        assert_eq!(scene.pixel_at(&Location { lat: 0.0, lon: 2.0 }), Some((1, 1)));
        assert_eq!(scene.pixel_at(&Location { lat: 3.0, lon: 0.5 }), None);
    }

    #[test]
    fn test_fill_value_is_missing() {
        let scene = scene_2x2();
        assert!(scene.sample(&Location { lat: 0.5, lon: 1.5 }).is_none());
        let sample = scene.sample(&Location { lat: 1.5, lon: 1.5 }).unwrap();
        assert_eq!(sample.green, 1010.0);
    }

    #[test]
    fn test_empty_scene_has_no_pixels() {
        let mut scene = scene_2x2();
        scene.width = 0;
        scene.height = 0;
        let loc = Location { lat: 0.5, lon: 0.5 };
        assert_eq!(scene.pixel_at(&loc), None);
        assert!(scene.sample(&loc).is_none());
        assert!(scene.validate().is_err());
    }

    #[tokio::test]
    async fn test_empty_scene_source_reports_unavailable() {
        let mut scene = scene_2x2();
        scene.width = 0;
        let source = RasterSource::new(scene);
        let err = source
            .fetch_bands(&Location { lat: 0.5, lon: 0.5 }, None)
            .await
            .unwrap_err();
        assert!(err.is_source_failure());
    }

    #[test]
    fn test_validate_band_lengths() {
        let mut scene = scene_2x2();
        scene.nir.pop();
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let json = r#"{
            "name": "tiny",
            "bbox": {"min_lon": 0.0, "min_lat": 0.0, "max_lon": 1.0, "max_lat": 1.0},
            "width": 1, "height": 1,
            "blue": [800], "green": [1000], "red": [1500], "nir": [2250], "swir": [1700]
        }"#;
        let scene = RasterScene::from_json(json).unwrap();
        assert_eq!(scene.fill_value, -9999.0);
        assert!(scene.acquired.is_none());
    }

    #[tokio::test]
    async fn test_raster_source_tags_real() {
        let source = RasterSource::new(scene_2x2());
        let result = source
            .fetch_bands(&Location { lat: 1.5, lon: 0.5 }, None)
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::Real);
        assert_eq!(result.provider, "test-scene");
        assert_eq!(result.bands.nir, 2250.0);
    }

    #[tokio::test]
    async fn test_raster_source_date_tolerance() {
        let exact = RasterSource::new(scene_2x2());
        let loc = Location { lat: 1.5, lon: 0.5 };
        let later = NaiveDate::from_ymd_opt(2024, 7, 4);

        let err = exact.fetch_bands(&loc, later).await.unwrap_err();
        assert!(matches!(err, EcoError::DataNotAvailable(_)));

        let tolerant = RasterSource::new(scene_2x2()).with_date_tolerance(5);
        assert!(tolerant.fetch_bands(&loc, later).await.is_ok());
    }

    #[tokio::test]
    async fn test_raster_source_outside_extent() {
        let source = RasterSource::new(scene_2x2());
        let err = source
            .fetch_bands(&Location { lat: 10.0, lon: 10.0 }, None)
            .await
            .unwrap_err();
        assert!(err.is_source_failure());
    }
}
