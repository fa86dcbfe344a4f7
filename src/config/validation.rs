//! Configuration validation logic.

use url::Url;

/// Upper bound on the spacing between two call launches
pub(crate) const MAX_LAUNCH_SPACING_MS: u64 = 60 * 60 * 1000;

pub(crate) fn validate_port(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    if port == 0 {
        return Err("Server port must be non-zero".into());
    }
    Ok(())
}

/// The provider must be able to reach the webhook routes on this URL.
pub(crate) fn validate_public_url(public_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(public_url)
        .map_err(|e| format!("Invalid public URL '{public_url}': {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!("Public URL must use http or https, got '{other}'").into());
        }
    }
    if url.host_str().is_none() {
        return Err(format!("Public URL '{public_url}' has no host").into());
    }
    Ok(())
}

pub(crate) fn validate_launch_spacing(spacing_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    if spacing_ms > MAX_LAUNCH_SPACING_MS {
        return Err(format!(
            "Launch spacing {spacing_ms}ms exceeds maximum of {MAX_LAUNCH_SPACING_MS}ms"
        )
        .into());
    }
    Ok(())
}
