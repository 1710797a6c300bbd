//! Shared test utilities for domain testing
//!
//! - `TestDataBuilder`: deterministic test data generation (ids, names,
//!   embedding vectors)
//! - `assertions`: custom assertion helpers

use uuid::Uuid;

/// Builder for test data with deterministic randomization
///
/// Ensures tests are reproducible by deriving all data from a seed.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a deterministic point id (UUID string)
    pub fn point_id(&self, n: u64) -> String {
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&self.seed.to_le_bytes());
        uuid_bytes[8..16].copy_from_slice(&n.to_le_bytes());
        Uuid::from_bytes(uuid_bytes).to_string()
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("collection", "main");
    /// // Returns: "test-collection-12345-main"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Generate a deterministic embedding vector of the given dimension
    ///
    /// Components are derived from the seed and `n`, so two builders with
    /// the same seed produce identical vectors and different `n` values
    /// produce distinct ones.
    pub fn embedding(&self, n: u64, dimension: usize) -> Vec<f32> {
        (0..dimension)
            .map(|i| {
                let x = self.seed.wrapping_mul(31).wrapping_add(n).wrapping_add(i as u64);
                ((x % 1000) as f32) / 1000.0
            })
            .collect()
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert two f32 slices are element-wise equal within a tolerance
    pub fn assert_vec_close(actual: &[f32], expected: &[f32], context: &str) {
        assert_eq!(
            actual.len(),
            expected.len(),
            "{}: vector lengths differ ({} vs {})",
            context,
            actual.len(),
            expected.len()
        );
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).abs() < 1e-6,
                "{}: component {} differs ({} vs {})",
                context,
                i,
                a,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.point_id(1), builder2.point_id(1));
        assert_eq!(builder1.embedding(3, 4), builder2.embedding(3, 4));
        assert_eq!(
            builder1.name("collection", "main"),
            builder2.name("collection", "main")
        );
    }

    #[test]
    fn test_data_builder_distinct_points() {
        let builder = TestDataBuilder::from_test_name("my_test");

        assert_ne!(builder.point_id(1), builder.point_id(2));
        assert_ne!(builder.embedding(1, 4), builder.embedding(2, 4));
    }

    #[test]
    fn test_embedding_dimension() {
        let builder = TestDataBuilder::new(7);
        assert_eq!(builder.embedding(0, 1536).len(), 1536);
    }
}
