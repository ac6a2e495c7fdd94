mod batch_norm;
mod conv;
mod conv_transpose;
mod layer;

pub use batch_norm::BatchNorm;
pub use conv::Conv;
pub use conv_transpose::ConvTranspose;
pub use layer::Layer;
