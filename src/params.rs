use std::env;

/// Hyperparameters shared with the training side.
///
/// The bundle on disk is identified by (latent_dim, intermediate_dim, epochs),
/// so these must match the values the models were trained with. No validation
/// happens here; a mismatched bundle simply fails to load.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperParams {
    /// Flattened input dimension (28x28 pixels)
    pub original_dim: usize,
    /// Latent space dimension
    pub latent_dim: usize,
    /// Hidden layer width of encoder and generator
    pub intermediate_dim: usize,
    /// Prior standard deviation used during training
    pub epsilon_std: f64,
    pub batch_size: usize,
    /// Epoch count the bundle was trained for (part of the file stem)
    pub epochs: usize,
}

impl Default for HyperParams {
    fn default() -> Self {
        Self {
            original_dim: 784,
            latent_dim: 3,
            intermediate_dim: 256,
            epsilon_std: 1.0,
            batch_size: 100,
            epochs: 50,
        }
    }
}

impl HyperParams {
    /// Read overrides from `ATLAS_*` environment variables (for pointing the
    /// run at a differently-sized bundle), falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            original_dim: env_usize("ATLAS_ORIGINAL_DIM", defaults.original_dim),
            latent_dim: env_usize("ATLAS_LATENT_DIM", defaults.latent_dim),
            intermediate_dim: env_usize("ATLAS_INTERMEDIATE_DIM", defaults.intermediate_dim),
            epsilon_std: env_f64("ATLAS_EPSILON_STD", defaults.epsilon_std),
            batch_size: env_usize("ATLAS_BATCH_SIZE", defaults.batch_size),
            epochs: env_usize("ATLAS_EPOCHS", defaults.epochs),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
