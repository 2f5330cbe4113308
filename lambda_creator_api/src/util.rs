// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT

/// Parse an optional JSON argument, e.g., environment variables given on the command line.
pub fn parse_json_arg<T: serde::de::DeserializeOwned>(name: &str, raw: Option<&str>) -> crate::common::LambdaCreatorResult<Option<T>> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => match serde_json::from_str::<T>(raw) {
            Ok(val) => Ok(Some(val)),
            Err(err) => Err(crate::common::LambdaCreatorError::MalformedInput(format!(
                "error parsing JSON for {}: {}",
                name, err
            ))),
        },
    }
}

pub fn create_template(path: &str, content: &str) -> anyhow::Result<()> {
    assert!(!path.is_empty());
    match std::path::Path::new(&path).exists() {
        true => anyhow::bail!("cannot overwrite configuration file: {}", path),
        false => {
            std::fs::write(path, content)?;
            Ok(())
        }
    }
}
