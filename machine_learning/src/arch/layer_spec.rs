use super::activations::ActFn;

/// Side length of every convolution window in the DCGAN architectures.
pub const KERNEL: usize = 4;

/// Whether a layer grows or shrinks the spatial size of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// A transposed convolution.
    Up,
    /// A convolution.
    Down,
}

/// The description of one block of a model: a (transposed) convolution, optionally followed by a
/// batch normalization, followed by an activation.
///
/// Built once by the architecture builders and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpec {
    kind: LayerKind,
    dim: (usize, usize),
    stride: usize,
    padding: usize,
    bias: bool,
    normalize: bool,
    act_fn: ActFn,
}

impl LayerSpec {
    /// Creates an upsampling block with bias, no normalization and a leaky rectifier.
    ///
    /// # Arguments
    /// * `dim` - The input and output channels.
    /// * `stride` - The stride of the transposed convolution.
    /// * `padding` - The padding of the transposed convolution.
    pub fn up(dim: (usize, usize), stride: usize, padding: usize) -> Self {
        Self::new(LayerKind::Up, dim, stride, padding)
    }

    /// Creates a downsampling block with bias, no normalization and a leaky rectifier.
    ///
    /// # Arguments
    /// * `dim` - The input and output channels.
    /// * `stride` - The stride of the convolution.
    /// * `padding` - The padding of the convolution.
    pub fn down(dim: (usize, usize), stride: usize, padding: usize) -> Self {
        Self::new(LayerKind::Down, dim, stride, padding)
    }

    fn new(kind: LayerKind, dim: (usize, usize), stride: usize, padding: usize) -> Self {
        Self {
            kind,
            dim,
            stride,
            padding,
            bias: true,
            normalize: false,
            act_fn: ActFn::leaky_relu(0.2),
        }
    }

    pub fn with_bias(self, bias: bool) -> Self {
        Self { bias, ..self }
    }

    pub fn with_norm(self, normalize: bool) -> Self {
        Self { normalize, ..self }
    }

    pub fn with_act_fn(self, act_fn: ActFn) -> Self {
        Self { act_fn, ..self }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn in_channels(&self) -> usize {
        self.dim.0
    }

    pub fn out_channels(&self) -> usize {
        self.dim.1
    }

    pub fn kernel(&self) -> usize {
        KERNEL
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn has_bias(&self) -> bool {
        self.bias
    }

    pub fn is_normalized(&self) -> bool {
        self.normalize
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }
}
