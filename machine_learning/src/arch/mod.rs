pub mod activations;
mod device;
mod layer_spec;
pub mod layers;
mod model;
mod sequential;

pub use device::Device;
pub use layer_spec::{KERNEL, LayerKind, LayerSpec};
pub use model::Model;
pub use sequential::Sequential;
