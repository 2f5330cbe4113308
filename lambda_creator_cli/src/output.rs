// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a command result.
///
/// Text output has one `key: value` line per top-level field. Maps are
/// expanded one level, lists are numbered.
pub fn format_output(value: &serde_json::Value, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => {
            let fields = match value {
                serde_json::Value::Object(fields) => fields,
                other => return Ok(scalar(other)),
            };
            let mut lines = vec![];
            for (key, value) in fields {
                match value {
                    serde_json::Value::Object(map) => {
                        lines.push(format!("{}:", key));
                        lines.extend(map.iter().map(|(k, v)| format!("  {}: {}", k, scalar(v))));
                    }
                    serde_json::Value::Array(items) => {
                        lines.push(format!("{}:", key));
                        for (i, item) in items.iter().enumerate() {
                            match item {
                                serde_json::Value::Object(map) => {
                                    lines.push(format!("  {}.", i + 1));
                                    lines.extend(map.iter().map(|(k, v)| format!("    {}: {}", k, scalar(v))));
                                }
                                other => lines.push(format!("  {}. {}", i + 1, scalar(other))),
                            }
                        }
                    }
                    other => lines.push(format!("{}: {}", key, scalar(other))),
                }
            }
            Ok(lines.join("\n"))
        }
    }
}
