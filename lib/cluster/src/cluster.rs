use simlens_core::{DataObject, ObjectId};

/// Algorithm-specific part of a cluster
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterKind {
    /// Dense region found by DBSCAN
    Basic,
    /// Objects DBSCAN could not attach to any dense region
    Noise,
    /// K-Means cluster with its final centroid
    KMeans { centroid: DataObject },
    /// Agglomerative cluster; merged clusters stay in place, flagged
    Agglomerative { is_merged: bool },
}

/// A named group of objects produced by one clustering call
///
/// Members borrow from the object slice the clusterer was given.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<'a> {
    pub name: String,
    pub objects: Vec<&'a DataObject>,
    pub kind: ClusterKind,
}

impl<'a> Cluster<'a> {
    pub fn new(name: String, kind: ClusterKind) -> Self {
        Self {
            name,
            objects: Vec::new(),
            kind,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }

    pub fn centroid(&self) -> Option<&DataObject> {
        match &self.kind {
            ClusterKind::KMeans { centroid } => Some(centroid),
            _ => None,
        }
    }

    pub fn is_noise(&self) -> bool {
        matches!(self.kind, ClusterKind::Noise)
    }

    pub fn is_merged(&self) -> bool {
        matches!(self.kind, ClusterKind::Agglomerative { is_merged: true })
    }

    pub fn member_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }
}

/// Largest clusters first; equal sizes keep creation order
pub fn sort_by_size(clusters: &mut [Cluster<'_>]) {
    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
}
