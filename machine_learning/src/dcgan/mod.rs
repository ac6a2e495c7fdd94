//! The DCGAN generator and discriminator architectures, from "Unsupervised Representation
//! Learning With Deep Convolutional Generative Adversarial Networks" by Radford et al.

mod config;
mod discriminator;
mod generator;

pub use config::{ArchitectureConfig, LabelKind};
pub use discriminator::{Discriminator, DiscriminatorBuilder};
pub use generator::{Generator, GeneratorBuilder};

use crate::{MlErr, Result};

/// Smallest image side both architectures accept.
pub const MIN_SIZE: usize = 16;

/// Validates an image side and derives the amount of intermediate blocks of the architectures.
///
/// Both networks have a 4x4 feature map at their narrow end and the first and last blocks each
/// account for one doubling, every intermediate block accounts for another one.
///
/// # Arguments
/// * `what` - The name of the checked size, used in the error.
/// * `size` - The image side.
///
/// # Returns
/// The amount of intermediate blocks, or an error if `size` is smaller than 16 or not a power
/// of 2.
pub fn num_repeats(what: &'static str, size: usize) -> Result<usize> {
    if size < MIN_SIZE || !size.is_power_of_two() {
        return Err(MlErr::InvalidSize { what, got: size });
    }

    Ok(size.ilog2() as usize - 3)
}

/// Checks that a channel count or dimensionality isn't zero.
fn non_zero(value: usize, msg: &'static str) -> Result<usize> {
    if value == 0 {
        return Err(MlErr::InvalidConfig(msg));
    }

    Ok(value)
}
