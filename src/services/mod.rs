// Service exports
pub mod cache;
pub mod loader;
pub mod semantic;

pub use cache::{CacheKey, CachedSimilarity};
pub use loader::{
    load_reference_profiles, load_requirements, parse_reference_profiles, parse_requirements,
    LoadError,
};
pub use semantic::{parse_score, SemanticSimilarityClient};
