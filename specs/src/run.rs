use serde::{Deserialize, Serialize};

use crate::machine_learning::{DiscriminatorSpec, GeneratorSpec};

/// The specification for a single generate-then-score run of a DCGAN pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSpec {
    pub generator: GeneratorSpec,
    pub discriminator: DiscriminatorSpec,
    pub batch_size: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for RunSpec {
    fn default() -> Self {
        Self {
            generator: GeneratorSpec::default(),
            discriminator: DiscriminatorSpec::default(),
            batch_size: 2,
            seed: None,
            parallel: false,
        }
    }
}

impl RunSpec {
    /// Parses a `RunSpec` from its json representation.
    ///
    /// # Arguments
    /// * `json` - The json text, missing fields take their default values.
    ///
    /// # Returns
    /// The parsed spec or the deserialization error.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
