use anyhow::{Result, anyhow, bail};
use url::Url;

/// Accepts trimmed absolute http(s) URLs only.
pub fn validate_http_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("url must not be empty");
    }
    let parsed = Url::parse(trimmed).map_err(|err| anyhow!("invalid url {trimmed}: {err}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => bail!("only http or https urls are allowed, got {scheme}"),
    }
}
