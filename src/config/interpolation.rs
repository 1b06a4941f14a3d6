// Copyright 2026 The Filterstream Project
// SPDX-License-Identifier: Apache-2.0

use super::error::ConfigError;

/// Replace `${NAME}` with the value of environment variable `NAME`.
///
/// An unset variable is an error so a missing token never turns into an
/// empty `Authorization` header. `${` without a closing brace, and `${}`,
/// are kept literally.
pub fn resolve_variables(input: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(0) | None => {
                out.push_str("${");
                rest = after;
            }
            Some(end) => {
                let name = &after[..end];
                let value = std::env::var(name).map_err(|_| ConfigError::UndefinedVariable {
                    name: name.to_string(),
                })?;
                out.push_str(&value);
                rest = &after[end + 1..];
            }
        }
    }
    out.push_str(rest);

    Ok(out)
}
