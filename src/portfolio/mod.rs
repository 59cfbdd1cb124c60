//! Asset records and the synthetic portfolio generator.

pub mod asset;
/// Seeded triangular-capacity / age-bucket generator.
pub mod generator;

pub use asset::{Asset, Portfolio};
pub use generator::{AgeBucket, GeneratorParams, generate_portfolio};
