use specs::machine_learning::{ActFnSpec, DiscriminatorSpec, GeneratorSpec, LabelKindSpec};

use crate::arch::activations::ActFn;

/// Slope of the default leaky rectifier of both architectures.
const DEFAULT_SLOPE: f32 = 0.2;

/// Whether a network takes class labels as an extra input. Kept for whoever conditions the
/// networks on labels, the DCGAN layers themselves never look at it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    #[default]
    None,
    Required,
    Generated,
}

impl From<LabelKindSpec> for LabelKind {
    fn from(spec: LabelKindSpec) -> Self {
        match spec {
            LabelKindSpec::None => LabelKind::None,
            LabelKindSpec::Required => LabelKind::Required,
            LabelKindSpec::Generated => LabelKind::Generated,
        }
    }
}

/// The configuration both architecture builders take.
///
/// For the generator `size` and `channels` describe the produced images, for the discriminator
/// the consumed ones. The discriminator ignores `encoding_dims`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchitectureConfig {
    pub encoding_dims: usize,
    pub size: usize,
    pub channels: usize,
    pub step_channels: usize,
    pub batchnorm: bool,
    pub act_fn: ActFn,
    pub last_act_fn: ActFn,
    pub label_kind: LabelKind,
}

impl ArchitectureConfig {
    /// The default generator: 100 encoding dims, 32x32 images with 3 channels, steps of 64
    /// channels, batch normalization, leaky rectifiers and a final `tanh`.
    pub fn generator_default() -> Self {
        Self::generator(&GeneratorSpec::default())
    }

    /// The default discriminator: 32x32 images with 3 channels, steps of 64 channels, batch
    /// normalization and leaky rectifiers everywhere, including the last layer.
    pub fn discriminator_default() -> Self {
        Self::discriminator(&DiscriminatorSpec::default())
    }

    /// Resolves a generator spec, missing nonlinearities take the generator's defaults.
    pub fn generator(spec: &GeneratorSpec) -> Self {
        Self {
            encoding_dims: spec.encoding_dims,
            size: spec.out_size,
            channels: spec.out_channels,
            step_channels: spec.step_channels,
            batchnorm: spec.batchnorm,
            act_fn: resolve_act_fn(spec.nonlinearity, ActFn::leaky_relu(DEFAULT_SLOPE)),
            last_act_fn: resolve_act_fn(spec.last_nonlinearity, ActFn::tanh()),
            label_kind: spec.label_type.into(),
        }
    }

    /// Resolves a discriminator spec, missing nonlinearities take the discriminator's defaults.
    pub fn discriminator(spec: &DiscriminatorSpec) -> Self {
        let encoding_dims = GeneratorSpec::default().encoding_dims;

        Self {
            encoding_dims,
            size: spec.in_size,
            channels: spec.in_channels,
            step_channels: spec.step_channels,
            batchnorm: spec.batchnorm,
            act_fn: resolve_act_fn(spec.nonlinearity, ActFn::leaky_relu(DEFAULT_SLOPE)),
            last_act_fn: resolve_act_fn(spec.last_nonlinearity, ActFn::leaky_relu(DEFAULT_SLOPE)),
            label_kind: spec.label_type.into(),
        }
    }
}

fn resolve_act_fn(spec: Option<ActFnSpec>, default: ActFn) -> ActFn {
    let Some(act_fn) = spec else {
        return default;
    };

    match act_fn {
        ActFnSpec::LeakyRelu { slope } => ActFn::leaky_relu(slope),
        ActFnSpec::Tanh => ActFn::tanh(),
        ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_defaults() {
        let config = ArchitectureConfig::generator_default();

        assert_eq!(config.encoding_dims, 100);
        assert_eq!(config.size, 32);
        assert_eq!(config.channels, 3);
        assert_eq!(config.step_channels, 64);
        assert!(config.batchnorm);
        assert_eq!(config.act_fn, ActFn::leaky_relu(0.2));
        assert_eq!(config.last_act_fn, ActFn::tanh());
        assert_eq!(config.label_kind, LabelKind::None);
    }

    #[test]
    fn discriminator_defaults_end_in_a_leaky_rectifier() {
        let config = ArchitectureConfig::discriminator_default();

        assert_eq!(config.size, 32);
        assert_eq!(config.channels, 3);
        assert_eq!(config.act_fn, ActFn::leaky_relu(0.2));
        assert_eq!(config.last_act_fn, ActFn::leaky_relu(0.2));
    }

    #[test]
    fn spec_nonlinearities_override_defaults() {
        let spec = DiscriminatorSpec {
            last_nonlinearity: Some(ActFnSpec::Sigmoid { amp: 1.0 }),
            label_type: LabelKindSpec::Required,
            ..Default::default()
        };

        let config = ArchitectureConfig::discriminator(&spec);

        assert_eq!(config.last_act_fn, ActFn::sigmoid(1.0));
        assert_eq!(config.act_fn, ActFn::leaky_relu(0.2));
        assert_eq!(config.label_kind, LabelKind::Required);
    }
}
