use std::path::Path;
use std::process;

use bucketagg_core::ParserOptions;
use bucketagg_metrics::{parse_definitions, MetricRegistry};

use super::{describe, print_json, read_source};
use crate::{report_error_value, OutputFormat};

pub(crate) fn cmd_check(file: &Path, options: &ParserOptions, output: OutputFormat, quiet: bool) {
    let src = read_source(file, output, quiet);
    let registry = MetricRegistry::with_defaults();

    let configs = match parse_definitions(&registry, &src, options) {
        Ok(configs) => configs,
        Err(e) => {
            report_error_value(&e.to_json_value(), output, quiet);
            process::exit(1);
        }
    };
    tracing::info!(file = %file.display(), count = configs.len(), "definitions checked");

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let defs: Vec<serde_json::Value> =
                configs.iter().map(|c| c.to_definition_json()).collect();
            print_json(&serde_json::Value::Array(defs));
        }
        OutputFormat::Text => {
            for config in &configs {
                println!("{}", describe(config));
            }
            println!("{}: {} definition(s) OK", file.display(), configs.len());
        }
    }
}
