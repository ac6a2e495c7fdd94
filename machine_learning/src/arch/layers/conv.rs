use ndarray::{Array2, Array4, ArrayView1, ArrayView2, ArrayView3, ArrayView4, Axis};

use crate::{MlErr, Result, arch::Device};

/// A 2D convolution over `[batch, channels, height, width]` inputs.
///
/// Its parameters are laid out as the weights, shaped `[out, in, kernel, kernel]`, followed by
/// the `out` biases when it has them.
#[derive(Debug, Clone)]
pub struct Conv {
    dim: (usize, usize),
    kernel: usize,
    stride: usize,
    padding: usize,
    bias: bool,
}

impl Conv {
    /// Creates a new `Conv`.
    ///
    /// # Arguments
    /// * `dim` - The input and output channels.
    /// * `kernel` - The side of the square window.
    /// * `stride` - The step between two consecutive windows.
    /// * `padding` - The zeros added on each border.
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
    ///
    /// # Returns
    /// The output side or an error if the stride is zero or the padded input is smaller than
    /// the kernel.
    pub fn out_dim(&self, n: usize) -> Result<usize> {
        if self.stride == 0 {
            return Err(MlErr::InvalidConfig("conv stride must be greater than 0"));
        }

        let padded = n + 2 * self.padding;
        padded
            .checked_sub(self.kernel)
            .map(|span| span / self.stride + 1)
            .ok_or(MlErr::SizeMismatch {
                what: "conv padded input",
                got: padded,
                expected: self.kernel,
            })
    }

    /// Convolves every sample of the batch `x`.
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
                what: "conv input channels",
                got: channels,
                expected: self.dim.0,
            });
        }

        let (out_h, out_w) = (self.out_dim(h)?, self.out_dim(w)?);
        let (weights, biases) = self.view_params(params)?;

        device.map_samples(x, |x| {
            let col = self.im2col(x, out_h, out_w);
            let mut y = weights.dot(&col);

            if let Some(b) = biases {
                y += &b.insert_axis(Axis(1));
            }

            Ok(y.into_shape_with_order((self.dim.1, out_h, out_w))?)
        })
    }

    /// Unfolds every window of `x` into a column, rows follow the `[in, kernel, kernel]` layout of
    /// the weights. Out of bounds positions read as zero.
    fn im2col(&self, x: ArrayView3<f32>, out_h: usize, out_w: usize) -> Array2<f32> {
        let (channels, h, w) = x.dim();
        let k = self.kernel;
        let mut col = Array2::zeros((channels * k * k, out_h * out_w));

        for c in 0..channels {
            for ki in 0..k {
                for kj in 0..k {
                    let row = (c * k + ki) * k + kj;

                    for oy in 0..out_h {
                        let Some(iy) = (oy * self.stride + ki)
                            .checked_sub(self.padding)
                            .filter(|&iy| iy < h)
                        else {
                            continue;
                        };

                        for ox in 0..out_w {
                            let Some(ix) = (ox * self.stride + kj)
                                .checked_sub(self.padding)
                                .filter(|&ix| ix < w)
                            else {
                                continue;
                            };

                            col[[row, oy * out_w + ox]] = x[[c, iy, ix]];
                        }
                    }
                }
            }
        }

        col
    }

    /// Gives a view of the raw parameter slice as the weights and biases of this layer.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters.
    ///
    /// # Returns
    /// A tuple containing the weights, flattened to `[out, in * kernel * kernel]`, and biases.
    fn view_params<'a>(
        &self,
        params: &'a [f32],
    ) -> Result<(ArrayView2<'a, f32>, Option<ArrayView1<'a, f32>>)> {
        if params.len() != self.size() {
            return Err(MlErr::SizeMismatch {
                what: "conv params",
                got: params.len(),
                expected: self.size(),
            });
        }

        let (w_raw, b_raw) = params.split_at(self.weights_size());
        let shape = (self.dim.1, self.dim.0 * self.kernel * self.kernel);
        let weights = ArrayView2::from_shape(shape, w_raw)?;
        let biases = self.bias.then_some(ArrayView1::from(b_raw));
        Ok((weights, biases))
    }
}
