//! Test data generators for band scenes.
//!
//! Scenes are produced as JSON in the format the raster source loads, so
//! tests can exercise the real file path without checked-in data.

use std::io::Write;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Fill value written into generated scenes.
pub const SCENE_FILL_VALUE: f64 = -9999.0;

/// Creates a scene where every pixel carries the same band values.
///
/// # Arguments
///
/// * `name` - Scene name, reported as the provider on results
/// * `bbox` - `(min_lon, min_lat, max_lon, max_lat)`
/// * `width`, `height` - Raster dimensions
/// * `acquired` - Optional ISO date (`YYYY-MM-DD`)
/// * `bands` - `[blue, green, red, nir, swir]` digital numbers
///
/// # Example
///
/// ```
/// use test_utils::{uniform_scene, bands};
///
/// let scene = uniform_scene("s", (0.0, 0.0, 1.0, 1.0), 2, 2, None, bands::MIDRANGE);
/// assert_eq!(scene["red"].as_array().unwrap().len(), 4);
/// ```
pub fn uniform_scene(
    name: &str,
    bbox: (f64, f64, f64, f64),
    width: usize,
    height: usize,
    acquired: Option<&str>,
    bands: [f64; 5],
) -> Value {
    let n = width * height;
    build_scene(name, bbox, width, height, acquired, |band| vec![bands[band]; n])
}

/// Creates a scene whose western half holds `bands` and eastern half is fill.
///
/// Useful for testing fallback on missing pixels.
pub fn half_filled_scene(
    name: &str,
    bbox: (f64, f64, f64, f64),
    width: usize,
    height: usize,
    bands: [f64; 5],
) -> Value {
    build_scene(name, bbox, width, height, None, |band| {
        let mut values = Vec::with_capacity(width * height);
        for _row in 0..height {
            for col in 0..width {
                if col < width / 2 {
                    values.push(bands[band]);
                } else {
                    values.push(SCENE_FILL_VALUE);
                }
            }
        }
        values
    })
}

fn build_scene(
    name: &str,
    bbox: (f64, f64, f64, f64),
    width: usize,
    height: usize,
    acquired: Option<&str>,
    band_values: impl Fn(usize) -> Vec<f64>,
) -> Value {
    let (min_lon, min_lat, max_lon, max_lat) = bbox;
    let mut scene = json!({
        "name": name,
        "bbox": {
            "min_lon": min_lon,
            "min_lat": min_lat,
            "max_lon": max_lon,
            "max_lat": max_lat,
        },
        "width": width,
        "height": height,
        "fill_value": SCENE_FILL_VALUE,
        "blue": band_values(0),
        "green": band_values(1),
        "red": band_values(2),
        "nir": band_values(3),
        "swir": band_values(4),
    });
    if let (Some(date), Value::Object(map)) = (acquired, &mut scene) {
        map.insert("acquired".to_string(), json!(date));
    }
    scene
}

/// Writes a scene to a temporary `.json` file.
///
/// The file is removed when the returned handle is dropped.
pub fn write_scene_file(scene: &Value) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(scene.to_string().as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::bands;

    #[test]
    fn test_uniform_scene_shape() {
        let scene = uniform_scene("s", (0.0, 0.0, 2.0, 1.0), 4, 2, Some("2024-07-01"), bands::WATER);
        assert_eq!(scene["width"], 4);
        assert_eq!(scene["acquired"], "2024-07-01");
        for band in ["blue", "green", "red", "nir", "swir"] {
            assert_eq!(scene[band].as_array().map(Vec::len), Some(8));
        }
        assert_eq!(scene["nir"][0], 300.0);
    }

    #[test]
    fn test_uniform_scene_without_date() {
        let scene = uniform_scene("s", (0.0, 0.0, 1.0, 1.0), 1, 1, None, bands::MIDRANGE);
        assert!(scene.get("acquired").is_none());
    }

    #[test]
    fn test_half_filled_scene() {
        let scene = half_filled_scene("s", (0.0, 0.0, 2.0, 1.0), 2, 1, bands::MIDRANGE);
        assert_eq!(scene["red"][0], 2000.0);
        assert_eq!(scene["red"][1], SCENE_FILL_VALUE);
    }

    #[test]
    fn test_write_scene_file() {
        let scene = uniform_scene("s", (0.0, 0.0, 1.0, 1.0), 1, 1, None, bands::MIDRANGE);
        let file = write_scene_file(&scene).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["name"], "s");
    }
}
