use burn::{
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{Encoder, Generator, Vae, VaeConfig};
use crate::params::HyperParams;

/// The three persisted artifacts of one training run. Read-only after load.
pub struct ModelBundle<B: Backend> {
    pub vae: Vae<B>,
    pub encoder: Encoder<B>,
    pub generator: Generator<B>,
}

/// File stem encoding the hyperparameters the bundle was trained with,
/// e.g. `ld_3_id_256_e_50_encoder`. The recorder appends its own extension.
pub fn artifact_stem(params: &HyperParams, artifact: &str) -> String {
    format!(
        "ld_{}_id_{}_e_{}_{}",
        params.latent_dim, params.intermediate_dim, params.epochs, artifact
    )
}

pub fn artifact_path(dir: &str, params: &HyperParams, artifact: &str) -> PathBuf {
    Path::new(dir).join(artifact_stem(params, artifact))
}

/// Save all three artifacts of a bundle to disk
pub fn save_bundle<B: Backend>(
    bundle: &ModelBundle<B>,
    dir: &str,
    params: &HyperParams,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let recorder = CompactRecorder::new();
    recorder
        .record(
            bundle.vae.clone().into_record(),
            artifact_path(dir, params, "vae"),
        )
        .map_err(|e| format!("Failed to save vae artifact: {:?}", e))?;
    recorder
        .record(
            bundle.encoder.clone().into_record(),
            artifact_path(dir, params, "encoder"),
        )
        .map_err(|e| format!("Failed to save encoder artifact: {:?}", e))?;
    recorder
        .record(
            bundle.generator.clone().into_record(),
            artifact_path(dir, params, "generator"),
        )
        .map_err(|e| format!("Failed to save generator artifact: {:?}", e))?;

    println!("💾 Model bundle saved under: {}", dir);
    Ok(())
}

/// Load all three artifacts of a bundle from disk.
///
/// Records carry weights only, so each architecture is rebuilt from the
/// hyperparameters before its record is loaded. Any missing or incompatible
/// file surfaces as an error here; callers treat that as fatal.
pub fn load_bundle<B: Backend>(
    dir: &str,
    params: &HyperParams,
    device: &B::Device,
) -> Result<ModelBundle<B>, Box<dyn std::error::Error>> {
    let config = VaeConfig::from_params(params);

    let vae = load_vae(dir, params, &config, device)?;
    let encoder = load_encoder(dir, params, &config, device)?;
    let generator = load_generator(dir, params, &config, device)?;

    println!("📂 Model bundle loaded from: {}", dir);
    Ok(ModelBundle {
        vae,
        encoder,
        generator,
    })
}

fn load_vae<B: Backend>(
    dir: &str,
    params: &HyperParams,
    config: &VaeConfig,
    device: &B::Device,
) -> Result<Vae<B>, Box<dyn std::error::Error>> {
    let record = CompactRecorder::new()
        .load(artifact_path(dir, params, "vae"), device)
        .map_err(|e| format!("Failed to load vae artifact: {:?}", e))?;
    Ok(config.init::<B>(device).load_record(record))
}

pub fn load_encoder<B: Backend>(
    dir: &str,
    params: &HyperParams,
    config: &VaeConfig,
    device: &B::Device,
) -> Result<Encoder<B>, Box<dyn std::error::Error>> {
    let record = CompactRecorder::new()
        .load(artifact_path(dir, params, "encoder"), device)
        .map_err(|e| format!("Failed to load encoder artifact: {:?}", e))?;
    Ok(config.init_encoder::<B>(device).load_record(record))
}

pub fn load_generator<B: Backend>(
    dir: &str,
    params: &HyperParams,
    config: &VaeConfig,
    device: &B::Device,
) -> Result<Generator<B>, Box<dyn std::error::Error>> {
    let record = CompactRecorder::new()
        .load(artifact_path(dir, params, "generator"), device)
        .map_err(|e| format!("Failed to load generator artifact: {:?}", e))?;
    Ok(config.init_generator::<B>(device).load_record(record))
}
