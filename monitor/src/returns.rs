//! Return series loading.
//!
//! Two formats are accepted: a JSON array of numbers, or plain text with
//! one or more numbers per line separated by commas or whitespace. In the
//! text form, everything after `#` on a line is a comment.

use std::path::Path;

use crate::error::{Error, Result};

/// Load a return series from a file.
pub fn load(path: &Path) -> Result<Vec<f64>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::ReturnsRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let returns = parse(&contents)?;
    log::debug!("loaded {} returns from {}", returns.len(), path.display());
    Ok(returns)
}

/// Load a series if a path is given, otherwise an empty series.
pub fn load_optional(path: Option<&Path>) -> Result<Vec<f64>> {
    path.map_or_else(|| Ok(Vec::new()), load)
}

/// Parse a return series from a string.
pub fn parse(contents: &str) -> Result<Vec<f64>> {
    let returns: Vec<f64> = if contents.trim_start().starts_with('[') {
        serde_json::from_str(contents)?
    } else {
        parse_text(contents)?
    };
    validate(&returns)?;
    Ok(returns)
}

fn parse_text(contents: &str) -> Result<Vec<f64>> {
    let mut returns = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token.parse().map_err(|_| {
                Error::Returns(format!("line {}: '{token}' is not a number", line_num + 1))
            })?;
            returns.push(value);
        }
    }
    Ok(returns)
}

fn validate(returns: &[f64]) -> Result<()> {
    if let Some(i) = returns.iter().position(|r| !r.is_finite()) {
        return Err(Error::Returns(format!(
            "return #{} is not a finite number",
            i + 1
        )));
    }
    Ok(())
}
