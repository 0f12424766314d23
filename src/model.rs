use burn::{
    config::Config,
    module::Module,
    nn::{Linear, LinearConfig, Relu, Sigmoid},
    tensor::{backend::Backend, Tensor},
};

use crate::params::HyperParams;

#[derive(Config, Debug)]
pub struct VaeConfig {
    pub original_dim: usize,
    pub intermediate_dim: usize,
    pub latent_dim: usize,
}

impl Default for VaeConfig {
    fn default() -> Self {
        let params = HyperParams::default();
        Self {
            original_dim: params.original_dim,
            intermediate_dim: params.intermediate_dim,
            latent_dim: params.latent_dim,
        }
    }
}

impl VaeConfig {
    pub fn from_params(params: &HyperParams) -> Self {
        Self {
            original_dim: params.original_dim,
            intermediate_dim: params.intermediate_dim,
            latent_dim: params.latent_dim,
        }
    }

    pub fn init_encoder<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        Encoder {
            hidden: LinearConfig::new(self.original_dim, self.intermediate_dim).init(device),
            z_mean: LinearConfig::new(self.intermediate_dim, self.latent_dim).init(device),
            z_log_var: LinearConfig::new(self.intermediate_dim, self.latent_dim).init(device),
            activation: Relu::new(),
        }
    }

    pub fn init_generator<B: Backend>(&self, device: &B::Device) -> Generator<B> {
        Generator {
            hidden: LinearConfig::new(self.latent_dim, self.intermediate_dim).init(device),
            output: LinearConfig::new(self.intermediate_dim, self.original_dim).init(device),
            activation: Relu::new(),
            squash: Sigmoid::new(),
        }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Vae<B> {
        Vae {
            encoder: self.init_encoder(device),
            generator: self.init_generator(device),
        }
    }
}

/// Image -> latent distribution parameters
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    hidden: Linear<B>,
    z_mean: Linear<B>,
    z_log_var: Linear<B>,
    activation: Relu,
}

impl<B: Backend> Encoder<B> {
    /// Forward pass
    /// Input: [batch_size, original_dim] pixels in [0, 1]
    /// Output: ([batch_size, latent_dim] mean, [batch_size, latent_dim] log variance)
    pub fn forward(&self, x: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let h = self.activation.forward(self.hidden.forward(x));
        let z_mean = self.z_mean.forward(h.clone());
        let z_log_var = self.z_log_var.forward(h);
        (z_mean, z_log_var)
    }

    /// The deterministic latent code: the mean head alone. Prediction draws
    /// no reparameterization noise.
    pub fn encode(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let (z_mean, _) = self.forward(x);
        z_mean
    }

    pub fn latent_dim(&self) -> usize {
        self.z_mean.weight.dims()[1]
    }
}

/// Latent sample -> reconstructed image
#[derive(Module, Debug)]
pub struct Generator<B: Backend> {
    hidden: Linear<B>,
    output: Linear<B>,
    activation: Relu,
    squash: Sigmoid,
}

impl<B: Backend> Generator<B> {
    /// Forward pass
    /// Input: [batch_size, latent_dim]
    /// Output: [batch_size, original_dim] pixels in [0, 1]
    pub fn forward(&self, z: Tensor<B, 2>) -> Tensor<B, 2> {
        let h = self.activation.forward(self.hidden.forward(z));
        self.squash.forward(self.output.forward(h))
    }

    pub fn latent_dim(&self) -> usize {
        self.hidden.weight.dims()[0]
    }

    pub fn output_dim(&self) -> usize {
        self.output.weight.dims()[1]
    }
}

/// Full autoencoder graph, persisted alongside its two halves so the bundle
/// exposes the same objective the training side optimized.
#[derive(Module, Debug)]
pub struct Vae<B: Backend> {
    encoder: Encoder<B>,
    generator: Generator<B>,
}

impl<B: Backend> Vae<B> {
    /// Deterministic reconstruction through the mean head.
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let (recon, _, _) = self.forward_with_stats(x);
        recon
    }

    /// Reconstruction plus the latent statistics the objective needs.
    pub fn forward_with_stats(
        &self,
        x: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>, Tensor<B, 2>) {
        let (z_mean, z_log_var) = self.encoder.forward(x);
        let recon = self.generator.forward(z_mean.clone());
        (recon, z_mean, z_log_var)
    }

    pub fn encoder(&self) -> &Encoder<B> {
        &self.encoder
    }

    pub fn generator(&self) -> &Generator<B> {
        &self.generator
    }
}

#[derive(Config, Debug)]
pub struct VariationalLossConfig {
    pub original_dim: usize,
}

impl VariationalLossConfig {
    pub fn init(&self) -> VariationalLoss {
        VariationalLoss {
            original_dim: self.original_dim,
        }
    }
}

/// The training objective the bundle was optimized under: per-pixel binary
/// cross-entropy scaled back up to the full input dimension, plus the KL
/// divergence of the latent distribution from the unit Gaussian prior.
#[derive(Clone, Debug)]
pub struct VariationalLoss {
    original_dim: usize,
}

impl VariationalLoss {
    /// Batch-mean scalar loss from the input, its reconstruction, and the
    /// latent statistics.
    pub fn forward<B: Backend>(
        &self,
        input: Tensor<B, 2>,
        reconstruction: Tensor<B, 2>,
        z_mean: Tensor<B, 2>,
        z_log_var: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        // log(0) guard for saturated sigmoid outputs
        let recon = reconstruction.clamp(1e-7, 1.0 - 1e-7);

        let xent = (input.clone() * recon.clone().log()
            + (input.ones_like() - input) * (recon.ones_like() - recon).log())
        .mean_dim(1)
        .mul_scalar(-(self.original_dim as f64));

        let kl = (z_log_var.ones_like() + z_log_var.clone()
            - z_mean.powf_scalar(2.0)
            - z_log_var.exp())
        .sum_dim(1)
        .mul_scalar(-0.5);

        (xent + kl).mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray;

    fn ramp_batch(
        batch_size: usize,
        dim: usize,
        device: &<TestBackend as Backend>::Device,
    ) -> Tensor<TestBackend, 2> {
        let total = batch_size * dim;
        let pixels: Vec<f32> = (0..total).map(|v| (v % 256) as f32 / 255.0).collect();
        Tensor::from_data(TensorData::new(pixels, [batch_size, dim]), device)
    }

    #[test]
    fn test_model_creation() {
        let device = Default::default();
        let config = VaeConfig::default();
        let _model = config.init::<TestBackend>(&device);
    }

    #[test]
    fn test_config_matches_params() {
        let config = VaeConfig::default();
        assert_eq!(config.original_dim, 784);
        assert_eq!(config.intermediate_dim, 256);
        assert_eq!(config.latent_dim, 3);
    }

    #[test]
    fn test_encoder_output_dims() {
        let device = Default::default();
        let config = VaeConfig::default();
        let encoder = config.init_encoder::<TestBackend>(&device);

        let batch = ramp_batch(4, config.original_dim, &device);
        let (z_mean, z_log_var) = encoder.forward(batch);

        assert_eq!(z_mean.dims(), [4, config.latent_dim]);
        assert_eq!(z_log_var.dims(), [4, config.latent_dim]);
        assert_eq!(encoder.latent_dim(), config.latent_dim);
    }

    #[test]
    fn test_encode_is_mean_head() {
        let device = Default::default();
        let config = VaeConfig::default();
        let encoder = config.init_encoder::<TestBackend>(&device);

        let batch = ramp_batch(2, config.original_dim, &device);
        let (z_mean, _) = encoder.forward(batch.clone());
        let code = encoder.encode(batch);

        let mean_vec = z_mean.into_data().to_vec::<f32>().unwrap();
        let code_vec = code.into_data().to_vec::<f32>().unwrap();
        assert_eq!(mean_vec, code_vec);
    }

    #[test]
    fn test_generator_output_shape_and_range() {
        let device = Default::default();
        let config = VaeConfig::default();
        let generator = config.init_generator::<TestBackend>(&device);

        let z = Tensor::<TestBackend, 2>::from_data([[0.0f32, 0.0, 0.0]], &device);
        let decoded = generator.forward(z);

        assert_eq!(decoded.dims(), [1, config.original_dim]);
        assert_eq!(generator.latent_dim(), config.latent_dim);
        assert_eq!(generator.output_dim(), config.original_dim);

        let pixels = decoded.into_data().to_vec::<f32>().unwrap();
        assert_eq!(pixels.len(), 784);
        assert!(pixels.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_vae_reconstruction_shape() {
        let device = Default::default();
        let config = VaeConfig::default();
        let model = config.init::<TestBackend>(&device);

        let batch = ramp_batch(3, config.original_dim, &device);
        let (recon, z_mean, z_log_var) = model.forward_with_stats(batch);

        assert_eq!(recon.dims(), [3, config.original_dim]);
        assert_eq!(z_mean.dims(), [3, config.latent_dim]);
        assert_eq!(z_log_var.dims(), [3, config.latent_dim]);
    }

    #[test]
    fn test_variational_loss_is_finite_scalar() {
        let device = Default::default();
        let config = VaeConfig::default();
        let model = config.init::<TestBackend>(&device);
        let loss_fn = VariationalLossConfig::new(config.original_dim).init();

        let batch = ramp_batch(5, config.original_dim, &device);
        let (recon, z_mean, z_log_var) = model.forward_with_stats(batch.clone());
        let loss = loss_fn.forward(batch, recon, z_mean, z_log_var);

        assert_eq!(loss.dims(), [1]);
        let value = loss.into_data().to_vec::<f32>().unwrap()[0];
        assert!(value.is_finite());
        // xent dominates and is bounded below by zero for inputs in [0, 1]
        assert!(value > 0.0);
    }

    #[test]
    fn test_perfect_reconstruction_minimizes_objective() {
        let device = Default::default();
        let loss_fn = VariationalLossConfig::new(4).init();

        let input = Tensor::<TestBackend, 2>::from_data([[0.0f32, 1.0, 0.0, 1.0]], &device);
        let zeros = Tensor::<TestBackend, 2>::from_data([[0.0f32, 0.0, 0.0]], &device);

        let perfect = loss_fn.forward(input.clone(), input.clone(), zeros.clone(), zeros.clone());
        let uniform = Tensor::<TestBackend, 2>::from_data([[0.5f32, 0.5, 0.5, 0.5]], &device);
        let blurry = loss_fn.forward(input, uniform, zeros.clone(), zeros);

        let perfect = perfect.into_data().to_vec::<f32>().unwrap()[0];
        let blurry = blurry.into_data().to_vec::<f32>().unwrap()[0];
        assert!(perfect < blurry);
        // zero-mean zero-log-var latent stats make the KL term vanish
        assert!(perfect.abs() < 1e-2);
    }
}
