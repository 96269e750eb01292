//! CLI configuration file.
//!
//! ```toml
//! [parser]
//! strict_field_names = true
//! max_depth = 32
//! ```

use std::path::Path;

use bucketagg_core::ParserOptions;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    pub parser: ParserOptions,
}

pub(crate) fn parse_config(content: &str) -> Result<CliConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// Load parser options from `path` (defaults when absent). `--strict`
/// only ever turns strict matching on.
pub(crate) fn load_parser_options(path: Option<&Path>, strict: bool) -> Result<ParserOptions, String> {
    let mut options = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
            parse_config(&content)
                .map_err(|e| format!("could not parse '{}': {}", path.display(), e))?
                .parser
        }
        None => ParserOptions::default(),
    };
    if strict {
        options.strict_field_names = true;
    }
    tracing::debug!(
        strict = options.strict_field_names,
        max_depth = options.max_depth,
        "parser options loaded"
    );
    Ok(options)
}
