use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Latent codes for one dataset split, with positionally matching labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatentProjection {
    /// Latent space dimension (codes all have this length)
    pub latent_dim: usize,
    /// One code per sample, in dataset order
    pub codes: Vec<Vec<f32>>,
    /// Ground-truth digit labels, same order as codes
    pub labels: Vec<u8>,
}

impl LatentProjection {
    pub fn new(latent_dim: usize, codes: Vec<Vec<f32>>, labels: Vec<u8>) -> Self {
        Self {
            latent_dim,
            codes,
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Save latent projection to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize: {}", e))?;
        fs::write(path.as_ref(), json).map_err(|e| format!("Failed to write file: {}", e))?;
        Ok(())
    }

    /// Load latent projection from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let json =
            fs::read_to_string(path.as_ref()).map_err(|e| format!("Failed to read file: {}", e))?;
        let projection: LatentProjection =
            serde_json::from_str(&json).map_err(|e| format!("Failed to deserialize: {}", e))?;
        Ok(projection)
    }
}
