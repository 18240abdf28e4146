//! Sequential cluster names
//!
//! Names are `<prefix>-<n>` with an independent counter per prefix. The
//! generator is passed into every clustering call, so two calls sharing a
//! generator keep numbering where the previous one stopped.

use ahash::AHashMap;

pub const KMEANS_PREFIX: &str = "KMeans";
pub const DBSCAN_PREFIX: &str = "DBSCAN";
pub const AGGLOMERATIVE_PREFIX: &str = "Agglomerative";
pub const NOISE_PREFIX: &str = "Noise";

#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    counters: AHashMap<String, usize>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next name for `prefix`, starting at 1
    pub fn next_name(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}-{}", prefix, counter)
    }

    pub fn reset(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_per_prefix() {
        let mut names = NameGenerator::new();
        assert_eq!(names.next_name(KMEANS_PREFIX), "KMeans-1");
        assert_eq!(names.next_name(KMEANS_PREFIX), "KMeans-2");
        assert_eq!(names.next_name(NOISE_PREFIX), "Noise-1");
        assert_eq!(names.next_name(KMEANS_PREFIX), "KMeans-3");
    }

    #[test]
    fn test_reset() {
        let mut names = NameGenerator::new();
        names.next_name(DBSCAN_PREFIX);
        names.reset();
        assert_eq!(names.next_name(DBSCAN_PREFIX), "DBSCAN-1");
    }
}
