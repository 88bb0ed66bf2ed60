//! On-disk encodings of a [`Model`].

use std::path::Path;

use super::error::ModelError;
use super::model::Model;

/// A serialization format for model files.
pub trait ModelFormat: Send + Sync {
    /// Human-readable name of the format.
    fn name(&self) -> &'static str;

    /// File extension(s) for this format.
    fn extensions(&self) -> &'static [&'static str];

    fn read(&self, input: &[u8]) -> Result<Model, ModelError>;

    fn write(&self, model: &Model) -> Result<Vec<u8>, ModelError>;
}

/// Pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl ModelFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn read(&self, input: &[u8]) -> Result<Model, ModelError> {
        serde_json::from_slice(input).map_err(|e| ModelError::json(e.to_string()))
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, ModelError> {
        let mut bytes =
            serde_json::to_vec_pretty(model).map_err(|e| ModelError::json(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl ModelFormat for YamlFormat {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn read(&self, input: &[u8]) -> Result<Model, ModelError> {
        serde_yaml::from_slice(input).map_err(|e| ModelError::yaml(e.to_string()))
    }

    fn write(&self, model: &Model) -> Result<Vec<u8>, ModelError> {
        serde_yaml::to_string(model)
            .map(String::into_bytes)
            .map_err(|e| ModelError::yaml(e.to_string()))
    }
}

/// Supported model file extensions.
pub fn supported_extensions() -> &'static [&'static str] {
    &["json", "yaml", "yml"]
}

/// Detect format from file extension.
pub fn detect_format(path: &Path) -> Option<Box<dyn ModelFormat>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "json" => Some(Box::new(JsonFormat)),
        "yaml" | "yml" => Some(Box::new(YamlFormat)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::{ElementKind, PropertyValue};
    use rstest::rstest;

    #[rstest]
    #[case("model.json", "JSON")]
    #[case("model.YAML", "YAML")]
    #[case("model.yml", "YAML")]
    fn test_detect_format(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(detect_format(Path::new(path)).unwrap().name(), expected);
    }

    #[test]
    fn test_detect_unknown_extension() {
        assert!(detect_format(Path::new("model.xmi")).is_none());
        assert!(detect_format(Path::new("model")).is_none());
    }

    #[rstest]
    #[case(&JsonFormat)]
    #[case(&YamlFormat)]
    fn test_model_survives_write_and_read(#[case] format: &dyn ModelFormat) {
        let mut model = Model::with_standard_layers();
        let sa = model.layer("sa").cloned().unwrap();
        if let Some(pkg) = model.get_mut(&sa) {
            pkg.description = "<b>rich</b>".into();
            pkg.properties
                .insert("max_card".into(), PropertyValue::Literal("*".into()));
        }

        let bytes = format.write(&model).unwrap();
        let back = format.read(&bytes).unwrap();
        assert_eq!(back, model);
        assert_eq!(back.get(&sa).unwrap().kind, ElementKind::DataPkg);
    }
}
