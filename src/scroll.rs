pub mod normalizer;
pub mod scrub;
