//! Seeded synthetic portfolio generator.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::asset::{Asset, Portfolio};
use crate::error::{ProjectionError, first_error};

/// Tolerance on the sum of bucket probabilities.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// An age bucket: a selection probability and a half-open age range in years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeBucket {
    pub probability: f64,
    /// Youngest age in the bucket (inclusive).
    pub min_age: u32,
    /// Oldest age in the bucket (exclusive).
    pub max_age: u32,
}

impl AgeBucket {
    pub const fn new(probability: f64, min_age: u32, max_age: u32) -> Self {
        Self {
            probability,
            min_age,
            max_age,
        }
    }
}

/// Bucket names, in the order of [`GeneratorParams::age_buckets`].
pub const BUCKET_NAMES: [&str; 3] = ["young", "mid", "old"];

/// Immutable inputs to [`generate_portfolio`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    /// Number of assets to generate (> 0).
    pub asset_count: usize,
    /// Capacities are rescaled to sum to this value (MW).
    pub total_capacity_mw: f64,
    /// Lower bound of the triangular capacity distribution (MW, > 0).
    pub capacity_min_mw: f64,
    /// Mode of the triangular capacity distribution (MW).
    pub capacity_mode_mw: f64,
    /// Upper bound of the triangular capacity distribution (MW).
    pub capacity_max_mw: f64,
    /// Year from which ages are subtracted to get commission years.
    pub current_year: i32,
    /// Young, mid and old buckets.
    pub age_buckets: [AgeBucket; 3],
    /// Random seed; identical seeds give identical portfolios.
    pub seed: u64,
}

impl GeneratorParams {
    /// Collects every constraint violation, using `portfolio.*` field paths.
    pub fn violations(&self) -> Vec<ProjectionError> {
        let mut errors = Vec::new();

        if self.asset_count == 0 {
            errors.push(ProjectionError::validation(
                "portfolio.asset_count",
                "must be > 0",
            ));
        }
        if !self.total_capacity_mw.is_finite() || self.total_capacity_mw <= 0.0 {
            errors.push(ProjectionError::validation(
                "portfolio.total_capacity_mw",
                "must be finite and > 0",
            ));
        }

        let (min, mode, max) = (
            self.capacity_min_mw,
            self.capacity_mode_mw,
            self.capacity_max_mw,
        );
        if !min.is_finite() || min <= 0.0 {
            errors.push(ProjectionError::validation(
                "portfolio.capacity_min_mw",
                "must be finite and > 0",
            ));
        }
        if !max.is_finite() || min >= max {
            errors.push(ProjectionError::validation(
                "portfolio.capacity_max_mw",
                "must be finite and > portfolio.capacity_min_mw",
            ));
        }
        if !(min..=max).contains(&mode) {
            errors.push(ProjectionError::validation(
                "portfolio.capacity_mode_mw",
                "must lie within [capacity_min_mw, capacity_max_mw]",
            ));
        }

        let mut prob_sum = 0.0;
        for (bucket, name) in self.age_buckets.iter().zip(BUCKET_NAMES) {
            if !bucket.probability.is_finite() || bucket.probability < 0.0 {
                errors.push(ProjectionError::validation(
                    format!("portfolio.{name}_probability"),
                    "must be finite and >= 0",
                ));
            }
            if i64::from(self.current_year) - i64::from(bucket.max_age) < i64::from(i32::MIN) {
                errors.push(ProjectionError::validation(
                    format!("portfolio.{name}_ages"),
                    format!(
                        "ages up to {} put commission years before {}",
                        bucket.max_age,
                        i32::MIN
                    ),
                ));
            }
            if bucket.min_age >= bucket.max_age {
                errors.push(ProjectionError::validation(
                    format!("portfolio.{name}_ages"),
                    format!(
                        "age range [{}, {}) is empty",
                        bucket.min_age, bucket.max_age
                    ),
                ));
            }
            prob_sum += bucket.probability;
        }
        if (prob_sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            errors.push(ProjectionError::validation(
                "portfolio.age_bucket_probabilities",
                format!("must sum to 1, got {prob_sum}"),
            ));
        }

        errors
    }
}

/// Draws from a triangular distribution by inverting its CDF.
///
/// Requires `min < max` and `min <= mode <= max`.
pub fn sample_triangular(rng: &mut StdRng, min: f64, mode: f64, max: f64) -> f64 {
    let u: f64 = rng.random();
    let span = max - min;
    let split = (mode - min) / span;
    if u < split {
        min + (u * span * (mode - min)).sqrt()
    } else {
        max - ((1.0 - u) * span * (max - mode)).sqrt()
    }
}

/// Picks an index according to `probabilities` (assumed to sum to 1).
fn choose_bucket(rng: &mut StdRng, probabilities: &[f64]) -> usize {
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return i;
        }
    }
    // Rounding can leave the cumulative sum a hair under 1.
    probabilities.len() - 1
}

/// Generates a synthetic portfolio.
///
/// Capacities are drawn from the triangular distribution and rescaled to
/// sum to `total_capacity_mw`. Each asset then gets an age bucket and an
/// age drawn uniformly within it; `commission_year = current_year - age`.
/// Assets are named `A000`, `A001`, ...
///
/// # Errors
///
/// Returns the first validation error if the parameters are invalid.
pub fn generate_portfolio(params: &GeneratorParams) -> Result<Portfolio, ProjectionError> {
    first_error(params.violations())?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let n = params.asset_count;

    let mut capacities: Vec<f64> = (0..n)
        .map(|_| {
            sample_triangular(
                &mut rng,
                params.capacity_min_mw,
                params.capacity_mode_mw,
                params.capacity_max_mw,
            )
        })
        .collect();
    let raw_total: f64 = capacities.iter().sum();
    let rescale = params.total_capacity_mw / raw_total;
    for c in &mut capacities {
        *c *= rescale;
    }

    let probabilities = params.age_buckets.map(|b| b.probability);
    let buckets: Vec<usize> = (0..n)
        .map(|_| choose_bucket(&mut rng, &probabilities))
        .collect();

    let mut assets = Vec::with_capacity(n);
    for (i, (capacity_mw, bucket_idx)) in capacities.into_iter().zip(buckets).enumerate() {
        let bucket = params.age_buckets[bucket_idx];
        let age = rng.random_range(bucket.min_age..bucket.max_age);
        let commission_year = i32::try_from(i64::from(params.current_year) - i64::from(age))
            .map_err(|_| {
                ProjectionError::validation(
                    "portfolio.current_year",
                    format!("commission year {} - {age} is out of range", params.current_year),
                )
            })?;
        assets.push(Asset::new(format!("A{i:03}"), capacity_mw, commission_year));
    }

    debug!(
        assets = n,
        seed = params.seed,
        rescale, "generated synthetic portfolio"
    );
    Portfolio::new(assets)
}
