use log::debug;
use ndarray::{Array1, ArrayView4};

use super::{ArchitectureConfig, LabelKind, non_zero, num_repeats};
use crate::{
    MlErr, Result,
    arch::{Device, LayerSpec, Model, Sequential},
};

/// Builds DCGAN `Discriminator`s given a configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscriminatorBuilder {
    device: Device,
}

impl DiscriminatorBuilder {
    /// Creates a new `DiscriminatorBuilder`.
    ///
    /// # Arguments
    /// * `device` - Where the built discriminators evaluate their batches.
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    /// Builds a new `Discriminator` following a configuration.
    ///
    /// The first block halves the image into `step_channels` channels, each intermediate block
    /// halves it again while doubling the channels, and the last block collapses the remaining
    /// `4x4` map into a single score.
    ///
    /// # Arguments
    /// * `config` - The architecture of the discriminator, `encoding_dims` is ignored.
    ///
    /// # Returns
    /// The discriminator or a configuration error if `config.size` is smaller than 16, is not a
    /// power of 2, or some channel count is zero.
    pub fn build(&self, config: &ArchitectureConfig) -> Result<Discriminator> {
        let repeats = num_repeats("discriminator input size", config.size)?;
        let channels = non_zero(config.channels, "channels must be greater than 0")?;
        let mut d = non_zero(config.step_channels, "step_channels must be greater than 0")?;

        let use_bias = !config.batchnorm;
        let mut specs = Vec::with_capacity(repeats + 2);
        specs.push(
            LayerSpec::down((channels, d), 2, 1)
                .with_bias(true)
                .with_act_fn(config.act_fn),
        );

        for _ in 0..repeats {
            let next = d.checked_mul(2).ok_or(MlErr::InvalidConfig(
                "step_channels is too large for the input size",
            ))?;
            specs.push(
                LayerSpec::down((d, next), 2, 1)
                    .with_bias(use_bias)
                    .with_norm(config.batchnorm)
                    .with_act_fn(config.act_fn),
            );
            d = next;
        }

        specs.push(
            LayerSpec::down((d, 1), 1, 0)
                .with_bias(use_bias)
                .with_act_fn(config.last_act_fn),
        );

        debug!(repeats = repeats, depth = d, blocks = specs.len(); "built discriminator");

        Ok(Discriminator {
            config: *config,
            repeats,
            model: Sequential::new(specs, self.device),
        })
    }
}

/// A DCGAN discriminator: scores each image of a batch.
#[derive(Debug, Clone)]
pub struct Discriminator {
    config: ArchitectureConfig,
    repeats: usize,
    model: Sequential,
}

impl Discriminator {
    /// The model the discriminator evaluates.
    pub fn model(&self) -> &Sequential {
        &self.model
    }

    pub fn config(&self) -> &ArchitectureConfig {
        &self.config
    }

    /// The amount of intermediate downsampling blocks.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    pub fn label_kind(&self) -> LabelKind {
        self.config.label_kind
    }
}

impl Model for Discriminator {
    type Input<'a> = ArrayView4<'a, f32>;
    type Output = Array1<f32>;

    fn size(&self) -> usize {
        self.model.size()
    }

    /// Scores a batch shaped `[batch, channels, size, size]`, one score per image.
    fn forward(&self, params: &[f32], x: ArrayView4<'_, f32>) -> Result<Array1<f32>> {
        let (batch, channels, h, w) = x.dim();
        let ArchitectureConfig {
            channels: expected_channels,
            size,
            ..
        } = self.config;

        if channels != expected_channels {
            return Err(MlErr::SizeMismatch {
                what: "image channels",
                got: channels,
                expected: expected_channels,
            });
        }

        if let Some(side) = [h, w].into_iter().find(|&side| side != size) {
            return Err(MlErr::SizeMismatch {
                what: "image side",
                got: side,
                expected: size,
            });
        }

        let y = self.model.forward(params, x.to_owned())?;
        Ok(y.into_shape_with_order(batch)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{LayerKind, activations::ActFn};
    use ndarray::Array4;

    fn config(size: usize, batchnorm: bool) -> ArchitectureConfig {
        ArchitectureConfig {
            size,
            channels: 3,
            step_channels: 4,
            batchnorm,
            ..ArchitectureConfig::discriminator_default()
        }
    }

    #[test]
    fn channels_double_from_step_channels() {
        let discriminator = DiscriminatorBuilder::default().build(&config(64, true)).unwrap();
        let specs = discriminator.model().specs();

        let outs: Vec<_> = specs.iter().map(|s| s.out_channels()).collect();
        assert_eq!(outs, [4, 8, 16, 32, 1]);
        assert_eq!(specs[0].in_channels(), 3);
        assert!(specs.iter().all(|s| s.kind() == LayerKind::Down));
    }

    #[test]
    fn strides_and_paddings() {
        let discriminator = DiscriminatorBuilder::default().build(&config(32, true)).unwrap();
        let (last, rest) = discriminator.model().specs().split_last().unwrap();

        assert_eq!((last.stride(), last.padding()), (1, 0));
        for spec in rest {
            assert_eq!((spec.stride(), spec.padding()), (2, 1));
        }
    }

    #[test]
    fn first_block_is_always_biased() {
        for batchnorm in [true, false] {
            let discriminator = DiscriminatorBuilder::default()
                .build(&config(16, batchnorm))
                .unwrap();
            let specs = discriminator.model().specs();
            let (first, rest) = specs.split_first().unwrap();

            assert!(first.has_bias());
            assert!(!first.is_normalized());

            let (last, middle) = rest.split_last().unwrap();
            for spec in middle {
                assert_eq!(spec.has_bias(), !batchnorm);
                assert_eq!(spec.is_normalized(), batchnorm);
            }

            assert_eq!(last.has_bias(), !batchnorm);
            assert!(!last.is_normalized());
            assert_eq!(last.act_fn(), ActFn::leaky_relu(0.2));
        }
    }

    #[test]
    fn rejects_huge_step_channels() {
        let config = ArchitectureConfig {
            step_channels: usize::MAX / 2,
            ..config(32, true)
        };

        let err = DiscriminatorBuilder::default().build(&config).unwrap_err();
        assert!(matches!(err, MlErr::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn rejects_invalid_sizes() {
        for size in [8, 15, 17, 33] {
            let err = DiscriminatorBuilder::default()
                .build(&config(size, true))
                .unwrap_err();
            assert!(err.is_config(), "{size}: {err}");
        }
    }

    #[test]
    fn rejects_wrong_image_side() {
        let discriminator = DiscriminatorBuilder::default().build(&config(16, true)).unwrap();
        let params = vec![0.0; discriminator.size()];
        let x = Array4::zeros((1, 3, 16, 32));

        let err = discriminator.forward(&params, x.view()).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                what: "image side",
                got: 32,
                expected: 16
            }
        ));
    }
}
