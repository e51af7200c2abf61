//! Exact nearest neighbours for recall measurement.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use domain_vector::{Point, PointId};

pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // equal scores: the earlier point ranks higher
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Ids of the `k` points most cosine-similar to `query`, best first
pub fn top_k(points: &[Point], query: &[f32], k: usize) -> Vec<PointId> {
    if k == 0 {
        return Vec::new();
    }

    // min-heap holding the best k seen so far
    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(k + 1);
    for (index, point) in points.iter().enumerate() {
        let candidate = Candidate {
            score: cosine(&point.vector, query),
            index,
        };
        if heap.len() < k {
            heap.push(Reverse(candidate));
        } else if heap.peek().is_some_and(|Reverse(worst)| candidate > *worst) {
            heap.pop();
            heap.push(Reverse(candidate));
        }
    }

    let mut best: Vec<Candidate> = heap.into_iter().map(|Reverse(c)| c).collect();
    best.sort_by(|a, b| b.cmp(a));
    best.into_iter().map(|c| points[c.index].id.clone()).collect()
}

/// `|truth ∩ returned| / k`
pub fn recall(truth: &[PointId], returned: &[PointId], k: usize) -> f64 {
    if k == 0 {
        return 1.0;
    }
    let truth: HashSet<&PointId> = truth.iter().collect();
    let hits = returned.iter().filter(|id| truth.contains(id)).count();
    hits as f64 / k as f64
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<PointId> {
        raw.iter().copied().map(PointId::Num).collect()
    }

    #[test]
    fn test_cosine() {
        assert!((cosine(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine(&[1.0, 0.0], &[0.0, 3.0]).abs() < 1e-6);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_top_k_orders_by_similarity() {
        let points = vec![
            Point::new(1u64, vec![0.0, 1.0]),
            Point::new(2u64, vec![1.0, 0.0]),
            Point::new(3u64, vec![0.7, 0.7]),
            Point::new(4u64, vec![-1.0, 0.0]),
        ];
        assert_eq!(top_k(&points, &[1.0, 0.1], 2), ids(&[2, 3]));
        assert_eq!(top_k(&points, &[1.0, 0.1], 10).len(), 4);
        assert!(top_k(&points, &[1.0, 0.0], 0).is_empty());
    }

    #[test]
    fn test_ties_prefer_earlier_points() {
        let points = vec![
            Point::new(1u64, vec![1.0, 0.0]),
            Point::new(2u64, vec![1.0, 0.0]),
            Point::new(3u64, vec![1.0, 0.0]),
        ];
        assert_eq!(top_k(&points, &[1.0, 0.0], 2), ids(&[1, 2]));
    }

    #[test]
    fn test_recall() {
        assert_eq!(recall(&ids(&[1, 2, 3, 4]), &ids(&[4, 3, 2, 1]), 4), 1.0);
        assert_eq!(recall(&ids(&[1, 2, 3, 4]), &ids(&[1, 9]), 4), 0.25);
        assert_eq!(recall(&ids(&[1, 2]), &[], 2), 0.0);
        assert_eq!(mean(&[1.0, 0.5]), 0.75);
        assert_eq!(mean(&[]), 0.0);
    }
}
