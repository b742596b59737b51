//! Prometheus text exposition format (0.0.4).

use std::fmt::Write;

use dynavec_core::{MetricValue, Sample};

use crate::registry::MetricFamily;

/// Content type served by the metrics endpoint.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render gathered families into the text exposition format.
pub fn encode(families: &[MetricFamily]) -> String {
    let mut out = String::new();
    for family in families {
        render_family(family, &mut out);
    }
    out
}

fn render_family(family: &MetricFamily, out: &mut String) {
    let name = &family.desc.name;
    if !family.desc.help.is_empty() {
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(&family.desc.help));
    }
    let _ = writeln!(out, "# TYPE {} {}", name, family.desc.kind.as_str());

    for sample in &family.samples {
        render_sample(name, sample, out);
    }
}

fn render_sample(name: &str, sample: &Sample, out: &mut String) {
    let pairs = label_pairs(sample);
    match &sample.value {
        MetricValue::Counter(v) | MetricValue::Gauge(v) => {
            let _ = writeln!(out, "{}{} {}", name, block(&pairs), fmt_value(*v));
        }
        MetricValue::Histogram {
            sum,
            count,
            buckets,
        } => {
            for bucket in buckets {
                let mut with_le = pairs.clone();
                with_le.push(format!("le=\"{}\"", fmt_value(bucket.upper_bound)));
                let _ = writeln!(out, "{}_bucket{} {}", name, block(&with_le), bucket.cumulative);
            }
            let mut with_inf = pairs.clone();
            with_inf.push("le=\"+Inf\"".to_string());
            let _ = writeln!(out, "{}_bucket{} {}", name, block(&with_inf), count);
            let _ = writeln!(out, "{}_sum{} {}", name, block(&pairs), fmt_value(*sum));
            let _ = writeln!(out, "{}_count{} {}", name, block(&pairs), count);
        }
    }
}

fn label_pairs(sample: &Sample) -> Vec<String> {
    sample
        .labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect()
}

fn block(pairs: &[String]) -> String {
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", pairs.join(","))
    }
}

/// Escape a label value: backslash, double quote, newline.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Escape help text: backslash and newline only.
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        format!("{v}")
    }
}
