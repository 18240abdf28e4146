//! One-shot analysis requests over a dataset snapshot
//!
//! A request names the algorithm and carries its settings; [`run`] prepares
//! the dataset, calls the matching component and shapes the result for
//! serialization.

use serde::{Deserialize, Serialize};
use simlens_cluster::{
    Agglomerative, AgglomerativeSettings, Cluster, ClusterKind, ClusterSettings, Clusterer,
    Dbscan, DbscanSettings, KMeans, KMeansSettings, NameGenerator,
};
use simlens_core::{Dataset, Normalizer, ObjectId, ParameterValue};
use simlens_reduce::{PcaReducer, ReductionResult};
use simlens_similarity::{SimilarityComparer, SimilarityPair};
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Core(#[from] simlens_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What to compute, tagged by `algorithm` in JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum AnalysisRequest {
    KMeans(KMeansSettings),
    Dbscan(DbscanSettings),
    Agglomerative(AgglomerativeSettings),
    Similarity {
        /// Keep only the most similar pairs
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top: Option<usize>,
    },
    Reduce,
}

impl AnalysisRequest {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisRequest::KMeans(_) => "kmeans",
            AnalysisRequest::Dbscan(_) => "dbscan",
            AnalysisRequest::Agglomerative(_) => "agglomerative",
            AnalysisRequest::Similarity { .. } => "similarity",
            AnalysisRequest::Reduce => "reduce",
        }
    }
}

/// One cluster member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberReport {
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ParameterValue>>,
}

/// Owned, serializable view of a [`Cluster`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReport {
    pub name: String,
    pub size: usize,
    pub noise: bool,
    pub members: Vec<MemberReport>,
    /// K-Means only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Vec<ParameterValue>>,
}

impl ClusterReport {
    pub fn from_cluster(cluster: &Cluster<'_>, include_parameters: bool) -> Self {
        let members = cluster
            .objects
            .iter()
            .map(|o| MemberReport {
                id: o.id,
                name: o.name.clone(),
                values: if include_parameters { o.values.clone() } else { None },
            })
            .collect();

        let centroid = match &cluster.kind {
            ClusterKind::KMeans { centroid } => Some(centroid.values().to_vec()),
            _ => None,
        };

        Self {
            name: cluster.name.clone(),
            size: cluster.len(),
            noise: cluster.is_noise(),
            members,
            centroid,
        }
    }
}

/// Result of one request, tagged by `result` in JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum AnalysisOutput {
    Clusters { clusters: Vec<ClusterReport> },
    Similarity { pairs: Vec<SimilarityPair> },
    Coordinates(ReductionResult),
}

/// Read a dataset snapshot from a JSON file
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&contents)?;
    info!(
        path = %path.display(),
        objects = dataset.objects.len(),
        parameters = dataset.parameters.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Read an [`AnalysisRequest`] from a JSON file
pub fn load_request(path: impl AsRef<Path>) -> Result<AnalysisRequest> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Normalize unless every value already is
fn prepare(dataset: &Dataset) -> Result<Cow<'_, Dataset>> {
    if dataset.is_normalized() {
        Ok(Cow::Borrowed(dataset))
    } else {
        Ok(Cow::Owned(Normalizer::new().normalize(dataset)?))
    }
}

fn cluster_with<C: Clusterer>(
    clusterer: &C,
    dataset: &Dataset,
    settings: &C::Settings,
) -> Result<AnalysisOutput> {
    let prepared = prepare(dataset)?;
    let mut names = NameGenerator::new();
    let clusters = clusterer.cluster(&prepared.objects, settings, &mut names)?;

    let include = settings.metrics().include_parameters;
    let clusters = clusters
        .iter()
        .map(|c| ClusterReport::from_cluster(c, include))
        .collect();
    Ok(AnalysisOutput::Clusters { clusters })
}

/// Run one request against `dataset`.
///
/// Clustering and projection work on the normalized dataset; similarity
/// compares the values as given.
pub fn run(dataset: &Dataset, request: &AnalysisRequest) -> Result<AnalysisOutput> {
    debug!(dataset = dataset.id, algorithm = request.name(), "running analysis");

    match request {
        AnalysisRequest::KMeans(settings) => cluster_with(&KMeans::new(), dataset, settings),
        AnalysisRequest::Dbscan(settings) => cluster_with(&Dbscan::new(), dataset, settings),
        AnalysisRequest::Agglomerative(settings) => {
            cluster_with(&Agglomerative::new(), dataset, settings)
        }
        AnalysisRequest::Similarity { top } => {
            let comparer = SimilarityComparer::new();
            let pairs = match top {
                Some(n) => comparer.most_similar(dataset, *n),
                None => comparer.compare_all_objects(dataset),
            };
            Ok(AnalysisOutput::Similarity { pairs })
        }
        AnalysisRequest::Reduce => {
            let prepared = prepare(dataset)?;
            let result = PcaReducer::new().reduce_dimensions(&prepared.objects)?;
            Ok(AnalysisOutput::Coordinates(result))
        }
    }
}
