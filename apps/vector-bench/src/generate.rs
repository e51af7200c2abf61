use domain_vector::{Payload, Point};
use rand::Rng;
use serde_json::json;

use crate::dataset::SearchQuery;

pub const DEFAULT_LIMIT: u64 = 10;

/// Components uniform in [-1, 1), scaled to unit length
pub fn unit_vector<R: Rng>(rng: &mut R, dim: usize) -> Vec<f32> {
    if dim == 0 {
        return Vec::new();
    }
    loop {
        let mut vector: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0)).collect();
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            vector.iter_mut().for_each(|v| *v /= norm);
            return vector;
        }
    }
}

/// Points with ids `1..=count` and payload `{"i": id - 1}`
pub fn points<R: Rng>(rng: &mut R, dim: usize, count: u64) -> Vec<Point> {
    (1..=count)
        .map(|i| {
            let mut payload = Payload::new();
            payload.insert("i".to_string(), json!(i - 1));
            Point::new(i, unit_vector(rng, dim)).with_payload(payload)
        })
        .collect()
}

pub fn searches<R: Rng>(rng: &mut R, dim: usize, count: usize) -> Vec<SearchQuery> {
    (0..count)
        .map(|_| SearchQuery {
            vector: unit_vector(rng, dim),
            limit: DEFAULT_LIMIT,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_vector::PointId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_vectors_are_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for vector in (0..20).map(|_| unit_vector(&mut rng, 384)) {
            assert_eq!(vector.len(), 384);
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
        }
    }

    #[test]
    fn test_components_cover_both_signs() {
        let mut rng = StdRng::seed_from_u64(7);
        let components: Vec<f32> = (0..100).flat_map(|_| unit_vector(&mut rng, 384)).collect();
        let negative = components.iter().filter(|v| **v < 0.0).count();
        // roughly half of 38400 should be negative
        assert!(negative > 15_000 && negative < 23_400, "negative components: {negative}");
    }

    #[test]
    fn test_points_numbered_from_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let points = points(&mut rng, 8, 5);
        let ids: Vec<_> = points.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, (1..=5).map(PointId::Num).collect::<Vec<_>>());
        assert_eq!(points[0].payload["i"], json!(0));
        assert_eq!(points[4].payload["i"], json!(4));
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = points(&mut StdRng::seed_from_u64(42), 4, 3);
        let b = points(&mut StdRng::seed_from_u64(42), 4, 3);
        assert_eq!(a, b);

        let queries = searches(&mut StdRng::seed_from_u64(42), 4, 2);
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.limit == DEFAULT_LIMIT));
    }
}
