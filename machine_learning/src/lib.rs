pub mod arch;
pub mod dcgan;
pub mod error;
mod initialization;

pub use error::{MlErr, Result};
pub use initialization::initialize_weights;
