//! Utility functions

use url::Url;

/// Version information for the tool
#[derive(Debug, Clone)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, built {})", self.version, self.git_hash, self.build_time)
    }
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Split a `KEY=VALUE` argument
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse one `--env` argument into pairs.
///
/// An argument with a single `=` is one pair and may contain commas in its
/// value. With more than one `=` it is a comma-separated list of pairs.
pub fn parse_env_arg(s: &str) -> Result<Vec<(String, String)>, String> {
    match s.matches('=').count() {
        0 => Err(format!("invalid KEY=VALUE: no `=` found in `{}`", s)),
        1 => Ok(vec![parse_key_val(s.trim_matches('"'))?]),
        _ => s
            .split(',')
            .map(|pair| parse_key_val(pair.trim_matches('"')))
            .collect(),
    }
}

/// A URL with its userinfo removed, for logging
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        _ => raw.to_string(),
    }
}
