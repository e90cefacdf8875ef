//! Per-generation request context
//!
//! One request drives one generation pass: it carries the clustering
//! toggle, the per-cluster exposure bound, and the seeded random source
//! used for every weighted draw in the pass. Reusing one request across
//! passes keeps outputs reproducible; sharing its RNG across concurrent
//! passes is a caller bug and is ruled out by the `&mut` borrow.

use rand::Rng;

/// Default number of nodes exposed per cluster
pub const DEFAULT_CLUSTER_SIZE: usize = 2;

/// Request context for one generation pass
#[derive(Debug)]
pub struct GenerationRequest<R: Rng> {
    /// Whether name-based clustering is applied at all
    pub use_cluster: bool,
    /// Upper bound on nodes exposed per cluster; clamped to the cluster
    /// size when a cluster is smaller
    pub cluster_size: usize,
    /// Random source for weighted draws, exclusively borrowed for the
    /// duration of a pass
    pub rng: R,
}

impl<R: Rng> GenerationRequest<R> {
    /// Create a request with clustering enabled and the default exposure
    /// bound.
    pub fn new(rng: R) -> Self {
        GenerationRequest {
            use_cluster: true,
            cluster_size: DEFAULT_CLUSTER_SIZE,
            rng,
        }
    }

    /// Create a request with clustering disabled; `cluster_nodes` becomes
    /// a no-op.
    pub fn without_cluster(rng: R) -> Self {
        GenerationRequest {
            use_cluster: false,
            cluster_size: DEFAULT_CLUSTER_SIZE,
            rng,
        }
    }

    /// Override the per-cluster exposure bound.
    pub fn with_cluster_size(mut self, cluster_size: usize) -> Self {
        self.cluster_size = cluster_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let request = GenerationRequest::new(StdRng::seed_from_u64(0));
        assert!(request.use_cluster);
        assert_eq!(request.cluster_size, 2);
    }

    #[test]
    fn test_without_cluster() {
        let request = GenerationRequest::without_cluster(StdRng::seed_from_u64(0));
        assert!(!request.use_cluster);
    }

    #[test]
    fn test_with_cluster_size() {
        let request = GenerationRequest::new(StdRng::seed_from_u64(0)).with_cluster_size(3);
        assert_eq!(request.cluster_size, 3);
    }
}
