use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::Position;

/// Constants of the default left-to-right table layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing_x: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 10.0,
            origin_y: 10.0,
            spacing_x: 300.0,
        }
    }
}

impl LayoutConfig {
    pub fn position(&self, index: usize) -> Position {
        Position::new(self.origin_x + self.spacing_x * index as f64, self.origin_y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Spaces per nesting level in canonical text.
    pub indent: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub layout: LayoutConfig,
    pub codec: CodecConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    origin_x: Option<f64>,
    origin_y: Option<f64>,
    spacing_x: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodecConfigFile {
    indent: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    codec: Option<CodecConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.origin_x {
            config.layout.origin_x = v;
        }
        if let Some(v) = layout.origin_y {
            config.layout.origin_y = v;
        }
        if let Some(v) = layout.spacing_x {
            config.layout.spacing_x = v;
        }
    }
    if let Some(codec) = parsed.codec {
        if let Some(v) = codec.indent {
            config.codec.indent = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.origin_x, 10.0);
        assert_eq!(config.layout.spacing_x, 300.0);
        assert_eq!(config.codec.indent, 2);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = parse_config(r#"{"layout": {"spacingX": 250}, "codec": {"indent": 4}}"#).unwrap();
        assert_eq!(config.layout.spacing_x, 250.0);
        assert_eq!(config.layout.origin_y, 10.0);
        assert_eq!(config.codec.indent, 4);
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(parse_config(r#"{"theme": "dark"}"#).is_err());
    }

    #[test]
    fn layout_positions_step_along_x() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.position(0), Position::new(10.0, 10.0));
        assert_eq!(layout.position(2), Position::new(610.0, 10.0));
    }
}
