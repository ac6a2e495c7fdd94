use ndarray::{Array3, Array4, ArrayView1, ArrayView2, ArrayView4};

use crate::{MlErr, Result, arch::Device};

/// A 2D transposed convolution, the learned upsampling counterpart of `Conv`.
///
/// Its parameters are laid out as the weights, shaped `[in, out, kernel, kernel]`, followed by
/// the `out` biases when it has them.
#[derive(Debug, Clone)]
pub struct ConvTranspose {
    dim: (usize, usize),
    kernel: usize,
    stride: usize,
    padding: usize,
    bias: bool,
}

impl ConvTranspose {
    /// Creates a new `ConvTranspose`.
    ///
    /// # Arguments
    /// * `dim` - The input and output channels.
    /// * `kernel` - The side of the square window each input position is spread over.
    /// * `stride` - The distance between the windows of two neighbouring input positions.
    /// * `padding` - The amount of rows and columns cropped from each border of the output.
    /// * `bias` - Whether a bias is added to each output channel.
    pub fn new(dim: (usize, usize), kernel: usize, stride: usize, padding: usize, bias: bool) -> Self {
        Self {
            dim,
            kernel,
            stride,
            padding,
            bias,
        }
    }

    /// Returns the amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.weights_size() + self.bias_size()
    }

    pub fn weights_size(&self) -> usize {
        self.dim.0 * self.dim.1 * self.kernel * self.kernel
    }

    pub fn bias_size(&self) -> usize {
        if self.bias { self.dim.1 } else { 0 }
    }

    /// Computes the output side for an input side of `n`.
    pub fn out_dim(&self, n: usize) -> Result<usize> {
        if self.stride == 0 {
            return Err(MlErr::InvalidConfig(
                "transposed conv stride must be greater than 0",
            ));
        }

        n.checked_sub(1)
            .map(|n| n * self.stride + self.kernel)
            .and_then(|full| full.checked_sub(2 * self.padding))
            .filter(|&out| out > 0)
            .ok_or(MlErr::SizeMismatch {
                what: "transposed conv input side",
                got: n,
                expected: 1,
            })
    }

    /// Spreads every sample of the batch `x` over a larger grid.
    ///
    /// # Returns
    /// A batch shaped `[batch, out, out_dim(height), out_dim(width)]`.
    pub fn forward(
        &self,
        params: &[f32],
        x: ArrayView4<f32>,
        device: Device,
    ) -> Result<Array4<f32>> {
        let (_, channels, h, w) = x.dim();
        if channels != self.dim.0 {
            return Err(MlErr::SizeMismatch {
                what: "transposed conv input channels",
                got: channels,
                expected: self.dim.0,
            });
        }

        let (out_h, out_w) = (self.out_dim(h)?, self.out_dim(w)?);
        let (weights, biases) = self.view_params(params)?;

        device.map_samples(x, |x| {
            let x = x.to_shape((channels, h * w))?;
            let cols = weights.t().dot(&x);
            let mut y = Array3::zeros((self.dim.1, out_h, out_w));

            let k = self.kernel;
            for o in 0..self.dim.1 {
                for ki in 0..k {
                    for kj in 0..k {
                        let row = (o * k + ki) * k + kj;

                        for i in 0..h {
                            let Some(oy) = (i * self.stride + ki)
                                .checked_sub(self.padding)
                                .filter(|&oy| oy < out_h)
                            else {
                                continue;
                            };

                            for j in 0..w {
                                let Some(ox) = (j * self.stride + kj)
                                    .checked_sub(self.padding)
                                    .filter(|&ox| ox < out_w)
                                else {
                                    continue;
                                };

                                y[[o, oy, ox]] += cols[[row, i * w + j]];
                            }
                        }
                    }
                }
            }

            if let Some(biases) = biases {
                for (mut channel, &bias) in y.outer_iter_mut().zip(biases) {
                    channel += bias;
                }
            }

            Ok(y)
        })
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    ///
    /// # Returns
    /// A tuple containing the weights, flattened to `[in, out * kernel * kernel]`, and biases.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, Option<ArrayView1<'a, f32>>)> {
        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                what: "transposed conv params",
                got: params.len(),
                expected: self.size(),
            });
        }

        let (w_raw, b_raw) = params.split_at(self.weights_size());
        let shape = (self.dim.0, self.dim.1 * self.kernel * self.kernel);
        let weights = ArrayView2::from_shape(shape, w_raw)?;
        let biases = self.bias.then_some(ArrayView1::from(b_raw));
        Ok((weights, biases))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dim_follows_transposed_conv_arithmetic() {
        let stem = ConvTranspose::new((1, 1), 4, 1, 0, true);
        assert_eq!(stem.out_dim(1).unwrap(), 4);

        let up = ConvTranspose::new((1, 1), 4, 2, 1, true);
        assert_eq!(up.out_dim(4).unwrap(), 8);
        assert_eq!(up.out_dim(16).unwrap(), 32);
        assert!(up.out_dim(0).is_err());

        let flat = ConvTranspose::new((1, 1), 4, 0, 0, true);
        assert!(matches!(flat.out_dim(4), Err(MlErr::InvalidConfig(_))));
    }

    #[test]
    fn single_pixel_is_spread_over_the_kernel() {
        let layer = ConvTranspose::new((1, 2), 4, 1, 0, true);
        let mut params: Vec<f32> = (0..32).map(|i| i as f32).collect();
        params.extend([10.0, 20.0]);
        let x = Array4::from_elem((1, 1, 1, 1), 2.0);

        let y = layer.forward(&params, x.view(), Device::Cpu).unwrap();

        assert_eq!(y.dim(), (1, 2, 4, 4));
        assert_eq!(y[[0, 0, 0, 0]], 10.0);
        assert_eq!(y[[0, 0, 3, 3]], 2.0 * 15.0 + 10.0);
        assert_eq!(y[[0, 1, 0, 0]], 2.0 * 16.0 + 20.0);
        assert_eq!(y[[0, 1, 2, 1]], 2.0 * 25.0 + 20.0);
    }

    #[test]
    fn overlapping_windows_accumulate() {
        let layer = ConvTranspose::new((1, 1), 4, 2, 1, false);
        let params = vec![1.0; 16];
        let x = Array4::ones((1, 1, 2, 2));

        let y = layer.forward(&params, x.view(), Device::Cpu).unwrap();

        assert_eq!(y.dim(), (1, 1, 4, 4));
        // the two central rows and columns are reached from both inputs of each axis
        assert_eq!(y[[0, 0, 0, 0]], 1.0);
        assert_eq!(y[[0, 0, 1, 1]], 4.0);
        assert_eq!(y[[0, 0, 0, 1]], 2.0);
        assert_eq!(y.sum(), 4.0 * 9.0);
    }
}
