use bucketagg_metrics::MetricRegistry;

use super::print_json;
use crate::OutputFormat;

pub(crate) fn cmd_kinds(output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    let kinds = MetricRegistry::with_defaults().kinds();
    match output {
        OutputFormat::Json => print_json(&serde_json::json!(kinds)),
        OutputFormat::Text => {
            for kind in kinds {
                println!("{}", kind);
            }
        }
    }
}
