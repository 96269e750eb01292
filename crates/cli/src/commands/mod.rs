mod check;
mod kinds;
mod parse;

pub(crate) use check::cmd_check;
pub(crate) use kinds::cmd_kinds;
pub(crate) use parse::cmd_parse;

use std::path::Path;
use std::process;

use bucketagg_metrics::{MetricConfig, MetricParams};

use crate::{report_error, OutputFormat};

/// Read `path` or report the failure and exit.
fn read_source(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// One-line text rendering of a parsed request.
fn describe(config: &MetricConfig) -> String {
    let mut parts = vec![format!("buckets_path={}", config.buckets_path)];
    if let Some(format) = &config.format {
        parts.push(format!("format={}", format));
    }
    parts.push(format!("gap_policy={}", config.gap_policy));
    match &config.settings {
        MetricParams::None => {}
        MetricParams::ExtendedStats { sigma } => parts.push(format!("sigma={}", sigma)),
        MetricParams::Percentiles { percents } => {
            let list: Vec<String> = percents.iter().map(|p| p.to_string()).collect();
            parts.push(format!("percents=[{}]", list.join(", ")));
        }
    }
    format!("{} ({}): {}", config.name, config.kind, parts.join(", "))
}

fn print_json(value: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
    println!("{}", pretty);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketagg_core::GapPolicy;

    #[test]
    fn describe_simple_metric() {
        let config = MetricConfig::new("avg", "avg_bucket", "a>b", MetricParams::None);
        assert_eq!(
            describe(&config),
            "avg (avg_bucket): buckets_path=a>b, gap_policy=skip"
        );
    }

    #[test]
    fn describe_with_format_and_settings() {
        let config = MetricConfig::new(
            "pcts",
            "percentiles_bucket",
            "a>b",
            MetricParams::Percentiles {
                percents: vec![50.0, 99.5],
            },
        )
        .format("0.0")
        .gap_policy(GapPolicy::InsertZeros);
        assert_eq!(
            describe(&config),
            "pcts (percentiles_bucket): buckets_path=a>b, format=0.0, gap_policy=insert_zeros, percents=[50, 99.5]"
        );
    }
}
