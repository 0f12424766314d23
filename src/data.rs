use burn::{
    data::{
        dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
        dataset::{
            vision::{MnistDataset, MnistItem},
            Dataset,
        },
    },
    tensor::{backend::Backend, Int, Tensor},
};
use std::sync::Arc;

pub const IMAGE_SIDE: usize = 28;
pub const PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;
pub const NUM_CLASSES: usize = 10;

/// Batched test images, flattened and normalized.
#[derive(Clone, Debug)]
pub struct MnistBatch<B: Backend> {
    /// [batch_size, 784] pixels in [0, 1]
    pub images: Tensor<B, 2>,
    /// [batch_size] digit labels, used only for plot coloring
    pub labels: Tensor<B, 1, Int>,
}

/// Batcher to convert raw MNIST items into flat normalized tensors.
#[derive(Clone, Debug, Default)]
pub struct MnistBatcher;

impl<B: Backend> Batcher<B, MnistItem, MnistBatch<B>> for MnistBatcher {
    fn batch(&self, items: Vec<MnistItem>, device: &B::Device) -> MnistBatch<B> {
        let batch_size = items.len();
        let mut pixels = Vec::with_capacity(batch_size * PIXELS);
        let mut labels = Vec::with_capacity(batch_size);

        for item in items {
            for row in item.image.iter() {
                for &value in row.iter() {
                    pixels.push(value / 255.0);
                }
            }
            labels.push(item.label as i32);
        }

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), device)
            .reshape([batch_size, PIXELS]);
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), device);

        MnistBatch { images, labels }
    }
}

/// Build an unshuffled loader over any MNIST-shaped dataset. Order is kept so
/// latent codes line up with dataset position.
pub fn build_loader<B: Backend>(
    dataset: impl Dataset<MnistItem> + 'static,
    batch_size: usize,
    device: B::Device,
) -> Arc<dyn DataLoader<B, MnistBatch<B>>> {
    DataLoaderBuilder::<B, _, _>::new(MnistBatcher::default())
        .batch_size(batch_size)
        .set_device(device)
        .build(dataset)
}

/// Loader over the standard MNIST test split (fetched/cached by burn).
pub fn build_test_loader<B: Backend>(
    batch_size: usize,
    device: B::Device,
) -> Arc<dyn DataLoader<B, MnistBatch<B>>> {
    build_loader(MnistDataset::test(), batch_size, device)
}

/// Uniform-fill stand-in for a real MNIST item, for tests that must not
/// touch the dataset cache.
#[cfg(test)]
pub(crate) fn synthetic_item(label: u8, fill: f32) -> MnistItem {
    MnistItem {
        image: [[fill; 28]; 28],
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::data::dataset::InMemDataset;

    type TestBackend = NdArray;

    #[test]
    fn test_batcher_flattens_and_normalizes() {
        let device = Default::default();

        let mut item = synthetic_item(7, 0.0);
        item.image[0][1] = 255.0;
        item.image[1][0] = 127.5;

        let batch: MnistBatch<TestBackend> =
            MnistBatcher.batch(vec![item], &device);

        assert_eq!(batch.images.dims(), [1, PIXELS]);
        let pixels = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(pixels[1], 1.0);
        assert_eq!(pixels[IMAGE_SIDE], 0.5);
        assert_eq!(pixels[0], 0.0);
        assert!(pixels.iter().all(|&p| (0.0..=1.0).contains(&p)));

        let labels: Vec<i64> = batch.labels.into_data().iter::<i64>().collect();
        assert_eq!(labels, vec![7]);
    }

    #[test]
    fn test_loader_preserves_dataset_order() {
        let device: <TestBackend as Backend>::Device = Default::default();

        let items: Vec<MnistItem> = (0..10).map(|i| synthetic_item(i as u8, 0.0)).collect();
        let loader = build_loader::<TestBackend>(InMemDataset::new(items), 4, device);

        let mut seen = Vec::new();
        for batch in loader.iter() {
            seen.extend(batch.labels.into_data().iter::<i64>());
        }
        assert_eq!(seen, (0..10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_canonical_dimensions() {
        assert_eq!(IMAGE_SIDE, 28);
        assert_eq!(PIXELS, 784);
        assert_eq!(NUM_CLASSES, 10);
    }
}
