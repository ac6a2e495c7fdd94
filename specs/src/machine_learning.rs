use serde::{Deserialize, Serialize};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    LeakyRelu { slope: f32 },
    Tanh,
    Sigmoid { amp: f32 },
}

/// The specification for the `LabelKind` enum.
///
/// Only stored by the networks, conditioning on labels is left to whoever
/// drives them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKindSpec {
    #[default]
    None,
    Required,
    Generated,
}

/// The specification for the DCGAN `Generator`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSpec {
    pub encoding_dims: usize,
    pub out_size: usize,
    pub out_channels: usize,
    pub step_channels: usize,
    pub batchnorm: bool,
    pub nonlinearity: Option<ActFnSpec>,
    pub last_nonlinearity: Option<ActFnSpec>,
    pub label_type: LabelKindSpec,
}

impl Default for GeneratorSpec {
    fn default() -> Self {
        Self {
            encoding_dims: 100,
            out_size: 32,
            out_channels: 3,
            step_channels: 64,
            batchnorm: true,
            nonlinearity: None,
            last_nonlinearity: None,
            label_type: LabelKindSpec::None,
        }
    }
}

/// The specification for the DCGAN `Discriminator`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscriminatorSpec {
    pub in_size: usize,
    pub in_channels: usize,
    pub step_channels: usize,
    pub batchnorm: bool,
    pub nonlinearity: Option<ActFnSpec>,
    pub last_nonlinearity: Option<ActFnSpec>,
    pub label_type: LabelKindSpec,
}

impl Default for DiscriminatorSpec {
    fn default() -> Self {
        Self {
            in_size: 32,
            in_channels: 3,
            step_channels: 64,
            batchnorm: true,
            nonlinearity: None,
            last_nonlinearity: None,
            label_type: LabelKindSpec::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_takes_defaults() {
        let generator: GeneratorSpec = serde_json::from_str("{}").unwrap();
        let discriminator: DiscriminatorSpec = serde_json::from_str("{}").unwrap();

        assert_eq!(generator, GeneratorSpec::default());
        assert_eq!(discriminator, DiscriminatorSpec::default());
    }

    #[test]
    fn act_fn_is_snake_case_tagged() {
        let json = r#"{ "nonlinearity": { "leaky_relu": { "slope": 0.1 } }, "last_nonlinearity": "tanh" }"#;
        let spec: DiscriminatorSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.nonlinearity, Some(ActFnSpec::LeakyRelu { slope: 0.1 }));
        assert_eq!(spec.last_nonlinearity, Some(ActFnSpec::Tanh));
        assert_eq!(spec.in_size, 32);
    }

    #[test]
    fn label_type() {
        let spec: GeneratorSpec = serde_json::from_str(r#"{ "label_type": "generated" }"#).unwrap();
        assert_eq!(spec.label_type, LabelKindSpec::Generated);
    }
}
