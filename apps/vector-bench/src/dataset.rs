//! On-disk benchmark data.
//!
//! Upsert files look like `{"upsert_points": {"points": [{id, vector, payload}]}}`,
//! search files are a JSON array of `{vector, limit}`.

use std::fs;
use std::path::{Path, PathBuf};

use domain_vector::Point;
use eyre::{Result, WrapErr, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertFile {
    pub upsert_points: UpsertBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertBody {
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub vector: Vec<f32>,
    pub limit: u64,
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("{} is not valid JSON", path.display()))
}

pub fn load_points(path: &Path) -> Result<Vec<Point>> {
    let value = read_json(path)?;
    if value.is_array() {
        bail!(
            "{} is a JSON array; an upsert file must be an object with an `upsert_points` key",
            path.display()
        );
    }
    let file: UpsertFile = serde_json::from_value(value)
        .wrap_err_with(|| format!("{} is not a valid upsert file", path.display()))?;
    Ok(file.upsert_points.points)
}

pub fn load_searches(path: &Path) -> Result<Vec<SearchQuery>> {
    let value = read_json(path)?;
    if value.is_object() {
        bail!(
            "{} is a JSON object; a search file must be an array of {{vector, limit}}",
            path.display()
        );
    }
    serde_json::from_value(value).wrap_err_with(|| format!("{} is not a valid search file", path.display()))
}

/// Write both files into `dir`, returning their paths
pub fn write_dataset(
    dir: &Path,
    points: Vec<Point>,
    searches: &[SearchQuery],
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    let upsert_path = dir.join(format!("upsert_{}.json", points.len()));
    let search_path = dir.join(format!("search_{}.json", searches.len()));

    let upsert = UpsertFile {
        upsert_points: UpsertBody { points },
    };
    fs::write(&upsert_path, serde_json::to_vec(&upsert)?)
        .wrap_err_with(|| format!("Failed to write {}", upsert_path.display()))?;
    fs::write(&search_path, serde_json::to_vec(searches)?)
        .wrap_err_with(|| format!("Failed to write {}", search_path.display()))?;

    Ok((upsert_path, search_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_vector::PointId;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vector-bench-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_write_then_load() {
        let dir = scratch_dir();
        let points = vec![Point::new(1u64, vec![0.6, 0.8]), Point::new(2u64, vec![1.0, 0.0])];
        let searches = vec![SearchQuery {
            vector: vec![1.0, 0.0],
            limit: 10,
        }];

        let (upsert_path, search_path) = write_dataset(&dir, points.clone(), &searches).unwrap();
        assert!(upsert_path.ends_with("upsert_2.json"));
        assert!(search_path.ends_with("search_1.json"));

        assert_eq!(load_points(&upsert_path).unwrap(), points);
        assert_eq!(load_searches(&search_path).unwrap(), searches);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_upsert_file_shape() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("upsert.json");
        fs::write(
            &path,
            r#"{"upsert_points": {"points": [{"id": 7, "vector": [0.5], "payload": {"i": 7}}]}}"#,
        )
        .unwrap();

        let points = load_points(&path).unwrap();
        assert_eq!(points[0].id, PointId::Num(7));
        assert_eq!(points[0].payload["i"], serde_json::json!(7));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_rejects_swapped_shapes() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let array = dir.join("array.json");
        let object = dir.join("object.json");
        fs::write(&array, "[]").unwrap();
        fs::write(&object, "{}").unwrap();

        let err = load_points(&array).unwrap_err();
        assert!(err.to_string().contains("JSON array"), "{err}");
        let err = load_searches(&object).unwrap_err();
        assert!(err.to_string().contains("JSON object"), "{err}");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = load_points(Path::new("/nonexistent/upsert.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
