use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::de::DeserializeOwned;
use simlens::{
    load_dataset, load_request, run, AgglomerativeSettings, AnalysisRequest, CategoricalMetric,
    DbscanSettings, KMeansSettings, MetricSettings, NumericMetric,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cluster, compare and project the objects of a dataset
#[derive(Parser, Debug)]
#[command(name = "simlens")]
#[command(about = "Dataset analysis: clustering, similarity and PCA", long_about = None)]
struct Args {
    /// Path to the dataset JSON file
    #[arg(short, long)]
    dataset: PathBuf,

    /// JSON file with settings for the chosen algorithm; flags override it
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug)]
struct MetricArgs {
    /// euclidean, manhattan or cosine
    #[arg(long)]
    numeric_metric: Option<NumericMetric>,

    /// hamming or jaccard
    #[arg(long)]
    categorical_metric: Option<CategoricalMetric>,

    /// Report member values along with ids and names
    #[arg(long)]
    include_parameters: bool,
}

impl MetricArgs {
    fn apply(&self, metrics: &mut MetricSettings) {
        if let Some(m) = self.numeric_metric {
            metrics.numeric_metric = m;
        }
        if let Some(m) = self.categorical_metric {
            metrics.categorical_metric = m;
        }
        if self.include_parameters {
            metrics.include_parameters = true;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// K-Means with deterministic seeding
    Kmeans {
        #[arg(short = 'k', long)]
        clusters: Option<usize>,
        #[arg(long)]
        max_iterations: Option<usize>,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Density-based clustering with a noise group
    Dbscan {
        #[arg(long)]
        epsilon: Option<f64>,
        #[arg(long)]
        min_points: Option<usize>,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Average-linkage bottom-up clustering
    Agglomerative {
        #[arg(long)]
        threshold: Option<f64>,
        #[command(flatten)]
        metrics: MetricArgs,
    },
    /// Similarity of every pair of objects
    Similarity {
        /// Only the N most similar pairs
        #[arg(long)]
        top: Option<usize>,
    },
    /// PCA projection to two dimensions
    Reduce,
    /// Run a request file (`{"algorithm": "...", ...}`)
    Run {
        #[arg(long)]
        request: PathBuf,
    },
}

fn settings_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> anyhow::Result<T> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(T::default()),
    }
}

fn build_request(command: &Command, settings: Option<&Path>) -> anyhow::Result<AnalysisRequest> {
    let request = match command {
        Command::Kmeans {
            clusters,
            max_iterations,
            metrics,
        } => {
            let mut s: KMeansSettings = settings_or_default(settings)?;
            if let Some(k) = clusters {
                s.number_of_clusters = *k;
            }
            if let Some(n) = max_iterations {
                s.max_iterations = *n;
            }
            metrics.apply(&mut s.metrics);
            AnalysisRequest::KMeans(s)
        }
        Command::Dbscan {
            epsilon,
            min_points,
            metrics,
        } => {
            let mut s: DbscanSettings = settings_or_default(settings)?;
            if let Some(e) = epsilon {
                s.epsilon = *e;
            }
            if let Some(m) = min_points {
                s.min_points = *m;
            }
            metrics.apply(&mut s.metrics);
            AnalysisRequest::Dbscan(s)
        }
        Command::Agglomerative { threshold, metrics } => {
            let mut s: AgglomerativeSettings = settings_or_default(settings)?;
            if let Some(t) = threshold {
                s.threshold = *t;
            }
            metrics.apply(&mut s.metrics);
            AnalysisRequest::Agglomerative(s)
        }
        Command::Similarity { top } => AnalysisRequest::Similarity { top: *top },
        Command::Reduce => AnalysisRequest::Reduce,
        Command::Run { request } => load_request(request)?,
    };
    Ok(request)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting simlens v{}", env!("CARGO_PKG_VERSION"));

    let dataset = load_dataset(&args.dataset)?;
    let request = build_request(&args.command, args.settings.as_deref())?;
    info!("Running {} on dataset '{}'", request.name(), dataset.name);

    let output = run(&dataset, &request)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);
    Ok(())
}
