use ndarray::Array4;

use super::{
    Device, LayerKind, LayerSpec, Model,
    layers::Layer,
};
use crate::{MlErr, Result};

/// A sequential model: information flows forward through its layers, one after the other.
///
/// Keeps the `LayerSpec`s it was built from next to the layers they were materialized into.
#[derive(Debug, Clone)]
pub struct Sequential {
    specs: Vec<LayerSpec>,
    layers: Vec<Layer>,
    device: Device,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `specs` - The blocks the sequential is composed of.
    /// * `device` - Where the forward passes get evaluated.
    ///
    /// # Returns
    /// A new `Sequential` instance.
    pub fn new<I>(specs: I, device: Device) -> Self
    where
        I: IntoIterator<Item = LayerSpec>,
    {
        let specs: Vec<_> = specs.into_iter().collect();
        let layers = specs.iter().flat_map(Self::materialize).collect();

        Self {
            specs,
            layers,
            device,
        }
    }

    fn materialize(spec: &LayerSpec) -> impl Iterator<Item = Layer> {
        let dim = (spec.in_channels(), spec.out_channels());
        let (kernel, stride, padding, bias) =
            (spec.kernel(), spec.stride(), spec.padding(), spec.has_bias());

        let transform = match spec.kind() {
            LayerKind::Up => Layer::conv_transpose(dim, kernel, stride, padding, bias),
            LayerKind::Down => Layer::conv(dim, kernel, stride, padding, bias),
        };
        let norm = spec
            .is_normalized()
            .then(|| Layer::batch_norm(spec.out_channels()));

        [Some(transform), norm, Some(Layer::act(spec.act_fn()))]
            .into_iter()
            .flatten()
    }

    /// The blocks this model was built from, in evaluation order.
    pub fn specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    /// The materialized layers, in evaluation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn device(&self) -> Device {
        self.device
    }
}

impl Model for Sequential {
    type Input<'a> = Array4<f32>;
    type Output = Array4<f32>;

    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn forward(&self, params: &[f32], mut x: Array4<f32>) -> Result<Array4<f32>> {
        let expected = self.size();
        if params.len() != expected {
            return Err(MlErr::SizeMismatch {
                what: "params",
                got: params.len(),
                expected,
            });
        }

        let mut rest = params;
        for layer in &self.layers {
            let (layer_params, tail) = rest.split_at(layer.size());
            x = layer.forward(layer_params, x, self.device)?;
            rest = tail;
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::activations::ActFn;

    #[test]
    fn materializes_norm_only_when_asked() {
        let model = Sequential::new(
            [
                LayerSpec::up((8, 4), 1, 0).with_norm(true),
                LayerSpec::up((4, 2), 2, 1).with_act_fn(ActFn::tanh()),
            ],
            Device::Cpu,
        );

        let layers = model.layers();
        assert_eq!(layers.len(), 5);
        assert!(matches!(layers[0], Layer::ConvTranspose(_)));
        assert!(matches!(layers[1], Layer::BatchNorm(_)));
        assert!(matches!(layers[2], Layer::Act(_)));
        assert!(matches!(layers[3], Layer::ConvTranspose(_)));
        assert!(matches!(layers[4], Layer::Act(ActFn::Tanh(_))));
    }

    #[test]
    fn size_adds_up_every_layer() {
        let model = Sequential::new(
            [
                LayerSpec::down((3, 2), 2, 1).with_bias(true),
                LayerSpec::down((2, 1), 1, 0).with_bias(false).with_norm(true),
            ],
            Device::Cpu,
        );

        let conv1 = 3 * 2 * 16 + 2;
        let conv2 = 2 * 16;
        let norm = 2;
        assert_eq!(model.size(), conv1 + conv2 + norm);
    }

    #[test]
    fn zero_stride_fails_instead_of_panicking() {
        let model = Sequential::new([LayerSpec::down((1, 1), 0, 0)], Device::Cpu);
        let params = vec![0.0; model.size()];
        let x = Array4::zeros((1, 1, 4, 4));

        let err = model.forward(&params, x).unwrap_err();
        assert!(matches!(err, MlErr::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn rejects_wrong_param_count() {
        let model = Sequential::new([LayerSpec::down((1, 1), 1, 0)], Device::Cpu);
        let x = Array4::zeros((1, 1, 4, 4));

        let err = model.forward(&[0.0; 3], x).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                what: "params",
                got: 3,
                expected: 17
            }
        ));
    }
}
