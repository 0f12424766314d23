#![recursion_limit = "256"]

use burn::backend::{wgpu::WgpuDevice, Wgpu};
use std::fs;

use latent_atlas::{
    bundle, data,
    model::VariationalLossConfig,
    mosaic,
    params::HyperParams,
    plotting, projection,
    sampling::{GridConfig, LatentGrid},
};

type Backend = Wgpu;

const MODELS_DIR: &str = "models";
const ATLAS_DIR: &str = "atlas";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = HyperParams::from_env();
    let grid_config = GridConfig::default();

    println!("🗺️  Latent atlas starting...");
    println!("Configuration:");
    println!(
        "  - Input: {} pixels ({}x{}), scaled to [0, 1]",
        params.original_dim,
        data::IMAGE_SIDE,
        data::IMAGE_SIDE
    );
    println!("  - Latent dimension: {}", params.latent_dim);
    println!("  - Intermediate dimension: {}", params.intermediate_dim);
    println!(
        "  - Bundle stem: {} (trained {} epochs, prior std {})",
        bundle::artifact_stem(&params, "*"),
        params.epochs,
        params.epsilon_std
    );
    println!("  - Batch size: {}", params.batch_size);
    println!(
        "  - Manifold grid: {} points per axis, quantiles ({}, {}) x{}",
        grid_config.points_per_axis,
        grid_config.quantile_lo,
        grid_config.quantile_hi,
        grid_config.scale
    );
    println!();

    let device = WgpuDevice::default();
    println!("📱 Using device: {:?}", device);
    println!();

    // Stage 1: model bundle
    println!("{}", "=".repeat(80));
    println!("📦 Loading Model Bundle");
    println!("{}", "=".repeat(80));
    println!();

    let bundle = bundle::load_bundle::<Backend>(MODELS_DIR, &params, &device)?;
    println!();

    // Stage 2: latent projection of the test split
    println!("{}", "=".repeat(80));
    println!("🔍 Projecting Test Split Into Latent Space");
    println!("{}", "=".repeat(80));
    println!();

    let loader = data::build_test_loader::<Backend>(params.batch_size, device.clone());

    if let Some(batch) = loader.iter().next() {
        let (recon, z_mean, z_log_var) = bundle.vae.forward_with_stats(batch.images.clone());
        let loss = VariationalLossConfig::new(params.original_dim)
            .init()
            .forward(batch.images, recon, z_mean, z_log_var);
        let value = loss
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| format!("Failed to read objective value: {:?}", e))?[0];
        println!(
            "🧪 Bundle sanity: variational objective on first test batch = {:.4}",
            value
        );
    }

    let latent = projection::project_dataset(&bundle.encoder, &loader)?;
    println!(
        "✅ Encoded {} test samples into {}D latent space",
        latent.len(),
        latent.latent_dim
    );
    println!();

    fs::create_dir_all(ATLAS_DIR)?;

    plotting::plot_latent_scatter_3d(&latent, &format!("{}/latent_scatter.png", ATLAS_DIR))?;

    let codes_path = format!("{}/latent_codes.json", ATLAS_DIR);
    latent.save_json(&codes_path)?;
    println!("💾 Latent codes saved to: {}", codes_path);
    println!();

    // Stage 3: manifold mosaics, one per slice of the outer grid axis
    println!("{}", "=".repeat(80));
    println!("🎨 Sampling Latent Grid Into Digit Mosaics");
    println!("{}", "=".repeat(80));
    println!();

    let grid = LatentGrid::build(&grid_config);
    let slices = mosaic::render_manifold_slices(&bundle.generator, &grid, &device, ATLAS_DIR)?;

    println!();
    println!("{}", "=".repeat(80));
    println!(
        "🎉 Atlas complete: 1 scatter figure, {} mosaic slices under {}/",
        slices.len(),
        ATLAS_DIR
    );
    println!("{}", "=".repeat(80));

    Ok(())
}
