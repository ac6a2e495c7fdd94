use log::debug;
use ndarray::{Array2, Array4, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use super::{ArchitectureConfig, LabelKind, non_zero, num_repeats};
use crate::{
    MlErr, Result,
    arch::{Device, LayerSpec, Model, Sequential},
};

/// Builds DCGAN `Generator`s given a configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeneratorBuilder {
    device: Device,
}

impl GeneratorBuilder {
    /// Creates a new `GeneratorBuilder`.
    ///
    /// # Arguments
    /// * `device` - Where the built generators evaluate their batches.
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Builds a new `Generator` following a configuration.
    ///
    /// The encoding is first expanded into a `4x4` map with `step_channels * 2^repeats`
    /// channels, each intermediate block then doubles the spatial size while halving the
    /// channels, and the last block doubles it once more into `channels` channels.
    ///
    /// # Arguments
    /// * `config` - The architecture of the generator.
    ///
    /// # Returns
    /// The generator or a configuration error if `config.size` is smaller than 16, is not a
    /// power of 2, or some dimension is zero.
    pub fn build(&self, config: &ArchitectureConfig) -> Result<Generator> {
        let repeats = num_repeats("generator output size", config.size)?;
        let encoding_dims = non_zero(config.encoding_dims, "encoding_dims must be greater than 0")?;
        let channels = non_zero(config.channels, "channels must be greater than 0")?;
        let step = non_zero(config.step_channels, "step_channels must be greater than 0")?;

        let mut d = step
            .checked_mul(1 << repeats)
            .ok_or(MlErr::InvalidConfig("step_channels is too large for the output size"))?;
        let depth = d;

        let use_bias = !config.batchnorm;
        let block = |dim, stride, padding| {
            LayerSpec::up(dim, stride, padding)
                .with_bias(use_bias)
                .with_norm(config.batchnorm)
                .with_act_fn(config.act_fn)
        };

        let mut specs = Vec::with_capacity(repeats + 2);
        specs.push(block((encoding_dims, d), 1, 0));

        for _ in 0..repeats {
            specs.push(block((d, d / 2), 2, 1));
            d /= 2;
        }

        specs.push(
            LayerSpec::up((d, channels), 2, 1)
                .with_bias(true)
                .with_act_fn(config.last_act_fn),
        );

        debug!(repeats = repeats, depth = depth, blocks = specs.len(); "built generator");

        Ok(Generator {
            config: *config,
            repeats,
            model: Sequential::new(specs, self.device),
        })
    }
}

/// A DCGAN generator: maps batches of encodings to batches of images.
#[derive(Debug, Clone)]
pub struct Generator {
    config: ArchitectureConfig,
    repeats: usize,
    model: Sequential,
}

impl Generator {
    /// The model the generator evaluates.
    pub fn model(&self) -> &Sequential {
        &self.model
    }

    pub fn config(&self) -> &ArchitectureConfig {
        &self.config
    }

    /// The amount of intermediate upsampling blocks.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    pub fn encoding_dims(&self) -> usize {
        self.config.encoding_dims
    }

    pub fn label_kind(&self) -> LabelKind {
        self.config.label_kind
    }

    /// Samples `n` encodings from the standard normal prior.
    ///
    /// # Arguments
    /// * `n` - The amount of encodings.
    /// * `rng` - A random number generator.
    ///
    /// # Returns
    /// A batch shaped `[n, encoding_dims]`.
    pub fn sampler<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Array2<f32> {
        Array2::from_shape_simple_fn((n, self.config.encoding_dims), || {
            StandardNormal.sample(&mut *rng)
        })
    }
}

impl Model for Generator {
    type Input<'a> = ArrayView2<'a, f32>;
    type Output = Array4<f32>;

    fn size(&self) -> usize {
        self.model.size()
    }

    /// Views each encoding as a `1x1` map with `encoding_dims` channels and runs it through the
    /// model, producing a batch shaped `[batch, channels, size, size]`.
    fn forward(&self, params: &[f32], z: ArrayView2<'_, f32>) -> Result<Array4<f32>> {
        let (batch, dims) = z.dim();
        if dims != self.config.encoding_dims {
            return Err(MlErr::SizeMismatch {
                what: "encoding dims",
                got: dims,
                expected: self.config.encoding_dims,
            });
        }

        let x = z.to_shape((batch, dims, 1, 1))?.into_owned();
        self.model.forward(params, x)
    }
}
