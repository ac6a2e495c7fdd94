use ndarray::{Array4, ArrayViewMut3, Axis, parallel::prelude::*};

use crate::{MlErr, Result, arch::Device};

/// Per channel normalization over the batch and spatial axes, followed by a learned scale and
/// shift. Statistics are always taken from the batch being evaluated.
///
/// Its parameters are laid out as the `channels` scales followed by the `channels` shifts.
#[derive(Debug, Clone)]
pub struct BatchNorm {
    channels: usize,
    eps: f32,
}

impl BatchNorm {
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            eps: 1e-5,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        2 * self.channels
    }

    pub fn forward(&self, params: &[f32], mut x: Array4<f32>, device: Device) -> Result<Array4<f32>> {
        if x.len_of(Axis(0)) == 0 {
            return Err(MlErr::EmptyBatch);
        }

        let channels = x.len_of(Axis(1));
        if channels != self.channels {
            return Err(MlErr::SizeMismatch {
                what: "batch norm input channels",
                got: channels,
                expected: self.channels,
            });
        }

        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                what: "batch norm params",
                got: params.len(),
                expected: self.size(),
            });
        }

        let (scales, shifts) = params.split_at(self.channels);
        let normalize = |(c, mut channel): (usize, ArrayViewMut3<f32>)| {
            let n = channel.len() as f32;
            let mean = channel.sum() / n;
            let var = channel.fold(0., |acc, &v| acc + (v - mean).powi(2)) / n;
            let scale = scales[c] / (var + self.eps).sqrt();
            let shift = shifts[c];

            channel.mapv_inplace(|v| (v - mean) * scale + shift);
        };

        match device {
            Device::Cpu => x.axis_iter_mut(Axis(1)).enumerate().for_each(normalize),
            Device::Parallel => x
                .axis_iter_mut(Axis(1))
                .into_par_iter()
                .enumerate()
                .for_each(normalize),
        }

        Ok(x)
    }
}
