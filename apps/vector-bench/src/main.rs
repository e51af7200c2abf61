//! Vector Bench
//!
//! Generates synthetic datasets and benchmarks a Qdrant server through the
//! typed gRPC client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_vector::{QdrantClient, QdrantConfig};
use eyre::{Result, WrapErr, ensure};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use vector_bench::{DEFAULT_COLLECTION, generate, load_points, load_searches, run, write_dataset};

#[derive(Parser)]
#[command(name = "vector-bench")]
#[command(about = "Generate vector datasets and benchmark Qdrant upsert/search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write random unit vectors as upsert and search files
    Generate {
        /// Vector dimension
        #[arg(long, default_value_t = 384)]
        dim: usize,

        /// Number of points to upsert
        #[arg(long, default_value_t = 5000)]
        points: u64,

        /// Number of search queries
        #[arg(long, default_value_t = 100)]
        queries: usize,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Upsert a dataset, run its searches and report timings
    Run {
        /// Upsert file produced by `generate`
        #[arg(long)]
        upsert: PathBuf,

        /// Search file produced by `generate`
        #[arg(long)]
        search: PathBuf,

        #[arg(long, default_value = DEFAULT_COLLECTION)]
        collection: String,

        /// Compare results with exact cosine neighbours
        #[arg(long)]
        recall: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            dim,
            points,
            queries,
            out,
            seed,
        } => {
            ensure!(dim > 0, "--dim must be positive");
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let data = generate::points(&mut rng, dim, points);
            let searches = generate::searches(&mut rng, dim, queries);
            let (upsert_path, search_path) = write_dataset(&out, data, &searches)?;

            info!(dim, points, queries, "Dataset written");
            println!("{}", upsert_path.display());
            println!("{}", search_path.display());
        }

        Commands::Run {
            upsert,
            search,
            collection,
            recall,
        } => {
            let points = load_points(&upsert)?;
            let searches = load_searches(&search)?;

            let config = QdrantConfig::from_env().wrap_err("Invalid Qdrant configuration")?;
            info!(url = %config.url, "Connecting to Qdrant...");
            let client = QdrantClient::connect(config)
                .await
                .wrap_err("Qdrant connection failed")?;

            let health = client.health_check().await?;
            info!(version = %health.version, "Qdrant is healthy");

            let report = run(&client, &collection, points, &searches, recall).await;
            client.close();
            println!("{}", report?);
        }
    }

    Ok(())
}
