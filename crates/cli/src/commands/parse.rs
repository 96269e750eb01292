use std::path::Path;
use std::process;

use bucketagg_core::ParserOptions;
use bucketagg_metrics::MetricRegistry;

use super::{describe, print_json, read_source};
use crate::{report_error_value, OutputFormat};

pub(crate) fn cmd_parse(
    file: &Path,
    kind: &str,
    name: &str,
    options: &ParserOptions,
    output: OutputFormat,
    quiet: bool,
) {
    let src = read_source(file, output, quiet);
    let registry = MetricRegistry::with_defaults();

    match registry.parse_request(kind, name, &src, options) {
        Ok(config) => match output {
            OutputFormat::Json => print_json(&config.to_definition_json()),
            OutputFormat::Text => println!("{}", describe(&config)),
        },
        Err(e) => {
            tracing::debug!(file = %file.display(), kind, error = %e, "request rejected");
            report_error_value(&e.to_json_value(), output, quiet);
            process::exit(1);
        }
    }
}
