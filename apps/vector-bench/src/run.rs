use std::fmt;
use std::time::{Duration, Instant};

use domain_vector::{DistanceMetric, Point, SearchPoints, VectorConfig, VectorRepository};
use eyre::{Result, WrapErr, ensure};
use tracing::{info, warn};

use crate::dataset::SearchQuery;
use crate::recall;

pub const DEFAULT_COLLECTION: &str = "test_collection";

#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub points: usize,
    pub failed_points: usize,
    pub upsert_elapsed: Duration,
    pub queries: usize,
    pub avg_search_latency: Duration,
    pub recall: Option<f64>,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "upserted {} points in {:.3}s ({} failed)",
            self.points - self.failed_points,
            self.upsert_elapsed.as_secs_f64(),
            self.failed_points
        )?;
        write!(
            f,
            "ran {} searches, average latency {:.3}ms",
            self.queries,
            self.avg_search_latency.as_secs_f64() * 1000.0
        )?;
        if let Some(recall) = self.recall {
            write!(f, "\nmean recall {recall:.4}")?;
        }
        Ok(())
    }
}

/// Recreate `collection`, load `points`, then time every search
pub async fn run<R: VectorRepository>(
    repository: &R,
    collection: &str,
    points: Vec<Point>,
    searches: &[SearchQuery],
    with_recall: bool,
) -> Result<BenchReport> {
    let dimension = points.first().map(|p| p.vector.len()).unwrap_or_default();
    ensure!(dimension > 0, "upsert file contains no points");
    ensure!(
        points.iter().all(|p| p.vector.len() == dimension),
        "points do not share one dimension ({dimension})"
    );

    if repository
        .list_collections()
        .await
        .wrap_err("Failed to list collections")?
        .iter()
        .any(|name| name == collection)
    {
        info!(collection, "Dropping existing collection");
        repository
            .delete_collection(collection)
            .await
            .wrap_err_with(|| format!("Failed to delete {collection}"))?;
    }

    let config = VectorConfig::new(dimension as u64).with_distance(DistanceMetric::Cosine);
    repository
        .create_collection(collection, config)
        .await
        .wrap_err_with(|| format!("Failed to create {collection}"))?;

    let truth = if with_recall { points.clone() } else { Vec::new() };
    let total = points.len();

    let started = Instant::now();
    let report = repository
        .upsert_batch(collection, points)
        .await
        .wrap_err("Upsert failed")?;
    let upsert_elapsed = started.elapsed();

    let failed_points = report.failed().count();
    for item in report.failed().take(5) {
        if let Err(err) = &item.outcome {
            warn!(id = %item.id, error = %err, "Point was not stored");
        }
    }
    info!(points = total, failed_points, elapsed_ms = upsert_elapsed.as_millis() as u64, "Upsert finished");

    let mut search_time = Duration::ZERO;
    let mut recalls = Vec::new();
    for (n, query) in searches.iter().enumerate() {
        let request = SearchPoints::new(collection, query.vector.clone(), query.limit).with_payload(false);

        let started = Instant::now();
        let hits = repository
            .search(request)
            .await
            .wrap_err_with(|| format!("Search {n} failed"))?;
        search_time += started.elapsed();

        if with_recall {
            let k = query.limit as usize;
            let expected = recall::top_k(&truth, &query.vector, k);
            let returned: Vec<_> = hits.into_iter().map(|hit| hit.id).collect();
            recalls.push(recall::recall(&expected, &returned, k));
        }
    }

    let avg_search_latency = if searches.is_empty() {
        Duration::ZERO
    } else {
        search_time / searches.len() as u32
    };

    Ok(BenchReport {
        points: total,
        failed_points,
        upsert_elapsed,
        queries: searches.len(),
        avg_search_latency,
        recall: with_recall.then(|| recall::mean(&recalls)),
    })
}
