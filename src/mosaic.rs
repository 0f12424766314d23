use burn::tensor::{backend::Backend, Tensor};
use image::{GrayImage, Luma};

use crate::data::IMAGE_SIDE;
use crate::model::Generator;
use crate::sampling::LatentGrid;

/// Square grayscale canvas tiling one grid slice's worth of decoded digits.
pub struct MosaicCanvas {
    digit_size: usize,
    tiles_per_side: usize,
    canvas: GrayImage,
}

impl MosaicCanvas {
    pub fn new(digit_size: usize, tiles_per_side: usize) -> Self {
        let side = (digit_size * tiles_per_side) as u32;
        Self {
            digit_size,
            tiles_per_side,
            canvas: GrayImage::new(side, side),
        }
    }

    /// Write one decoded digit into tile (row, col). Pixel values are
    /// expected in [0, 1]; out-of-range values are clamped.
    pub fn blit(&mut self, row: usize, col: usize, digit: &[f32]) {
        debug_assert!(row < self.tiles_per_side && col < self.tiles_per_side);
        debug_assert_eq!(digit.len(), self.digit_size * self.digit_size);

        for dy in 0..self.digit_size {
            for dx in 0..self.digit_size {
                let value = digit[dy * self.digit_size + dx];
                let shade = (value * 255.0).clamp(0.0, 255.0) as u8;
                let x = (col * self.digit_size + dx) as u32;
                let y = (row * self.digit_size + dy) as u32;
                self.canvas.put_pixel(x, y, Luma([shade]));
            }
        }
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.canvas.save(path)?;
        Ok(())
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.canvas.get_pixel(x as u32, y as u32).0[0]
    }

    pub fn side_pixels(&self) -> usize {
        self.digit_size * self.tiles_per_side
    }
}

/// Decode a single latent point to one flat digit image.
pub fn decode_digit<B: Backend>(
    generator: &Generator<B>,
    point: [f64; 3],
    device: &B::Device,
) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let z = Tensor::<B, 2>::from_floats(
        [[point[0] as f32, point[1] as f32, point[2] as f32]],
        device,
    );
    let decoded = generator.forward(z);
    decoded
        .into_data()
        .to_vec()
        .map_err(|e| format!("Failed to read decoded digit: {:?}", e).into())
}

/// Sweep the outer grid axis as the slice dimension, decode every (row, col)
/// point of each slice through the generator, and save one mosaic PNG per
/// slice, strictly in order. The canvas is reused across slices.
///
/// The slice value feeds the second latent component; mosaic rows sweep the
/// first component and columns the third.
pub fn render_manifold_slices<B: Backend>(
    generator: &Generator<B>,
    grid: &LatentGrid,
    device: &B::Device,
    out_dir: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(out_dir)?;

    let n = grid.points_per_axis();
    let mut canvas = MosaicCanvas::new(IMAGE_SIDE, n);
    let mut written = Vec::with_capacity(n);

    for (i, &slice_value) in grid.x.iter().enumerate() {
        for (j, &row_value) in grid.y.iter().enumerate() {
            for (k, &col_value) in grid.z.iter().enumerate() {
                let digit = decode_digit(generator, [row_value, slice_value, col_value], device)?;
                canvas.blit(j, k, &digit);
            }
        }

        let path = format!("{}/manifold_slice_{:02}.png", out_dir, i);
        canvas.save(&path)?;
        println!("🧩 Slice {:2}/{}: saved {}", i + 1, n, path);
        written.push(path);
    }

    Ok(written)
}
