//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ProjectionError;
use crate::portfolio::{AgeBucket, GeneratorParams};
use crate::projection::ProjectionParams;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Synthetic portfolio generation.
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    /// Technical yield parameters.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Prices, cost ratios and discounting.
    #[serde(default)]
    pub economics: EconomicsConfig,
    /// Analysis window and calibration.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Synthetic portfolio generation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Number of assets (must be > 0).
    pub asset_count: usize,
    /// Total installed capacity the assets are scaled to (MW).
    pub total_capacity_mw: f64,
    /// Triangular capacity distribution lower bound (MW).
    pub capacity_min_mw: f64,
    /// Triangular capacity distribution mode (MW).
    pub capacity_mode_mw: f64,
    /// Triangular capacity distribution upper bound (MW).
    pub capacity_max_mw: f64,
    /// Year ages are measured from.
    pub current_year: i32,
    pub young_probability: f64,
    pub mid_probability: f64,
    pub old_probability: f64,
    /// Young bucket age range `[min, max)` in years.
    pub young_ages: [u32; 2],
    /// Mid bucket age range `[min, max)` in years.
    pub mid_ages: [u32; 2],
    /// Old bucket age range `[min, max)` in years.
    pub old_ages: [u32; 2],
    /// Master random seed.
    pub seed: u64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            asset_count: 120,
            total_capacity_mw: 1980.0,
            capacity_min_mw: 5.0,
            capacity_mode_mw: 15.0,
            capacity_max_mw: 40.0,
            current_year: 2024,
            young_probability: 0.14,
            mid_probability: 0.51,
            old_probability: 0.35,
            young_ages: [0, 5],
            mid_ages: [5, 11],
            old_ages: [10, 21],
            seed: 7,
        }
    }
}

/// Technical yield parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Expected capacity factor (0.0-1.0].
    pub target_capacity_factor: f64,
    /// Asset operating life (years).
    pub life_years: u32,
    /// Annual output degradation (fraction).
    pub degradation_rate: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            target_capacity_factor: 0.31,
            life_years: 25,
            degradation_rate: 0.005,
        }
    }
}

/// Prices, cost ratios and discounting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomicsConfig {
    /// Average realised power price (£/MWh).
    pub price_per_mwh: f64,
    /// O&M cost share of gross revenue.
    pub om_cost_ratio: f64,
    /// Management fee share of gross revenue.
    pub mgmt_fee_ratio: f64,
    /// Annual discount rate.
    pub discount_rate: f64,
    /// Value the NPV is compared with (£m).
    pub reference_value: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            price_per_mwh: 65.0,
            om_cost_ratio: 0.10,
            mgmt_fee_ratio: 0.02,
            discount_rate: 0.08,
            reference_value: 2280.0,
        }
    }
}

/// Analysis window and calibration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// First projected year (inclusive).
    pub start_year: i32,
    /// Last projected year (inclusive).
    pub end_year: i32,
    /// Year of the reported generation figure.
    pub reference_year: i32,
    /// Reported generation in the reference year (GWh).
    pub reference_generation_gwh: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            start_year: 2025,
            end_year: 2049,
            reference_year: 2024,
            reference_generation_gwh: 5484.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"economics.discount_rate"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ProjectionError> for ConfigError {
    fn from(e: ProjectionError) -> Self {
        match e {
            ProjectionError::Validation { field, message } => Self { field, message },
            other => Self {
                field: "scenario".to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (UK wind portfolio, 2025-2049).
    pub fn baseline() -> Self {
        Self {
            portfolio: PortfolioConfig::default(),
            generation: GenerationConfig::default(),
            economics: EconomicsConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }

    /// Returns the low-price preset: baseline with a £45/MWh realised price.
    pub fn low_price() -> Self {
        Self {
            economics: EconomicsConfig {
                price_per_mwh: 45.0,
                ..EconomicsConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the high-discount preset: baseline discounted at 10%.
    pub fn high_discount() -> Self {
        Self {
            economics: EconomicsConfig {
                discount_rate: 0.10,
                ..EconomicsConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "low_price", "high_discount"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "low_price" => Ok(Self::low_price()),
            "high_discount" => Ok(Self::high_discount()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Generator inputs described by the `[portfolio]` section.
    pub fn generator_params(&self) -> GeneratorParams {
        let p = &self.portfolio;
        let bucket = |probability: f64, [min_age, max_age]: [u32; 2]| {
            AgeBucket::new(probability, min_age, max_age)
        };
        GeneratorParams {
            asset_count: p.asset_count,
            total_capacity_mw: p.total_capacity_mw,
            capacity_min_mw: p.capacity_min_mw,
            capacity_mode_mw: p.capacity_mode_mw,
            capacity_max_mw: p.capacity_max_mw,
            current_year: p.current_year,
            age_buckets: [
                bucket(p.young_probability, p.young_ages),
                bucket(p.mid_probability, p.mid_ages),
                bucket(p.old_probability, p.old_ages),
            ],
            seed: p.seed,
        }
    }

    /// Projection inputs described by the remaining sections.
    pub fn projection_params(&self) -> ProjectionParams {
        let g = &self.generation;
        let e = &self.economics;
        let a = &self.analysis;
        ProjectionParams {
            price_per_mwh: e.price_per_mwh,
            om_cost_ratio: e.om_cost_ratio,
            mgmt_fee_ratio: e.mgmt_fee_ratio,
            discount_rate: e.discount_rate,
            start_year: a.start_year,
            end_year: a.end_year,
            reference_year: a.reference_year,
            reference_generation_gwh: a.reference_generation_gwh,
            target_capacity_factor: g.target_capacity_factor,
            life_years: g.life_years,
            degradation_rate: g.degradation_rate,
            reference_value: e.reference_value,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        self.generator_params()
            .violations()
            .into_iter()
            .chain(self.projection_params().violations())
            .map(ConfigError::from)
            .collect()
    }
}
