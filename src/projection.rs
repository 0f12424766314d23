use burn::{data::dataloader::DataLoader, tensor::backend::Backend};
use std::sync::Arc;

use crate::{data::MnistBatch, export::LatentProjection, model::Encoder};

/// Run the encoder over every batch of the loader and collect one latent code
/// per sample, in loader order.
pub fn project_dataset<B: Backend>(
    encoder: &Encoder<B>,
    loader: &Arc<dyn DataLoader<B, MnistBatch<B>>>,
) -> Result<LatentProjection, Box<dyn std::error::Error>> {
    let latent_dim = encoder.latent_dim();
    let mut codes = Vec::new();
    let mut labels = Vec::new();

    for batch in loader.iter() {
        let z = encoder.encode(batch.images);
        let flat: Vec<f32> = z
            .into_data()
            .to_vec()
            .map_err(|e| format!("Failed to read latent codes: {:?}", e))?;
        for code in flat.chunks(latent_dim) {
            codes.push(code.to_vec());
        }

        labels.extend(batch.labels.into_data().iter::<i64>().map(|label| label as u8));
    }

    Ok(LatentProjection::new(latent_dim, codes, labels))
}
