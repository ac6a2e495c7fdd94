use ndarray::Array4;

use super::{BatchNorm, Conv, ConvTranspose};
use crate::{
    Result,
    arch::{Device, activations::ActFn},
};

/// A layer of a `Sequential` model. Layers don't own their parameters, they are handed their
/// slice of the model's parameters on each forward pass.
#[derive(Debug, Clone)]
pub enum Layer {
    Conv(Conv),
    ConvTranspose(ConvTranspose),
    BatchNorm(BatchNorm),
    Act(ActFn),
}
use Layer::*;

impl Layer {
    pub fn conv(
        dim: (usize, usize),
        kernel: usize,
        stride: usize,
        padding: usize,
        bias: bool,
    ) -> Self {
        Conv(super::Conv::new(dim, kernel, stride, padding, bias))
    }

    pub fn conv_transpose(
        dim: (usize, usize),
        kernel: usize,
        stride: usize,
        padding: usize,
        bias: bool,
    ) -> Self {
        ConvTranspose(super::ConvTranspose::new(
            dim, kernel, stride, padding, bias,
        ))
    }

    pub fn batch_norm(channels: usize) -> Self {
        BatchNorm(super::BatchNorm::new(channels))
    }

    pub fn act(act_fn: ActFn) -> Self {
        Act(act_fn)
    }

    /// Returns the amount of parameters this layer reads on each forward pass.
    pub fn size(&self) -> usize {
        match self {
            Conv(l) => l.size(),
            ConvTranspose(l) => l.size(),
            BatchNorm(l) => l.size(),
            Act(_) => 0,
        }
    }

    /// Makes a forward pass through the layer.
    ///
    /// # Arguments
    /// * `params` - This layer's slice of parameters.
    /// * `x` - A batch shaped `[batch, channels, height, width]`.
    /// * `device` - Where to evaluate the batch.
    ///
    /// # Returns
    /// The layer's output or an error if `x` or `params` have the wrong shape.
    pub fn forward(&self, params: &[f32], x: Array4<f32>, device: Device) -> Result<Array4<f32>> {
        match self {
            Conv(l) => l.forward(params, x.view(), device),
            ConvTranspose(l) => l.forward(params, x.view(), device),
            BatchNorm(l) => l.forward(params, x, device),
            Act(act_fn) => Ok(Self::activate(act_fn, x, device)),
        }
    }

    fn activate(act_fn: &ActFn, mut x: Array4<f32>, device: Device) -> Array4<f32> {
        match device {
            Device::Cpu => x.mapv_into(|z| act_fn.f(z)),
            Device::Parallel => {
                x.par_mapv_inplace(|z| act_fn.f(z));
                x
            }
        }
    }
}
