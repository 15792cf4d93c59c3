use rmcp::ErrorData as McpError;

use crate::{form::FormState, image_processing, url_validation::validate_http_url};

/// Downloads a reference image and returns its bytes with the declared media type.
async fn fetch_reference_bytes(raw_url: &str) -> Result<(Vec<u8>, Option<String>), McpError> {
    let validated_url = validate_http_url(raw_url).map_err(|err| {
        McpError::invalid_params(
            "invalid reference image url",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    let response = reqwest::get(validated_url.as_str()).await.map_err(|err| {
        McpError::internal_error(
            "fetch reference image failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(McpError::invalid_params(
            "fetch reference image failed",
            Some(serde_json::Value::String(format!("HTTP {status}"))),
        ));
    }
    let mime_from_header = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());
    let bytes = response.bytes().await.map_err(|err| {
        McpError::internal_error(
            "read reference image bytes failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    Ok((bytes.to_vec(), mime_from_header))
}

async fn read_reference_file(path: &str) -> Result<Vec<u8>, McpError> {
    tokio::fs::read(path).await.map_err(|err| {
        McpError::invalid_params(
            "read reference image file failed",
            Some(serde_json::Value::String(format!("{path}: {err}"))),
        )
    })
}

/// Attaches a reference image given as a URL or a local path. A URL wins when both are set.
pub async fn attach_reference(
    form: &mut FormState,
    url: Option<&str>,
    path: Option<&str>,
) -> Result<(), McpError> {
    let url = url.map(str::trim).filter(|value| !value.is_empty());
    let path = path.map(str::trim).filter(|value| !value.is_empty());
    let (bytes, declared) = match (url, path) {
        (Some(url), _) => fetch_reference_bytes(url).await?,
        (None, Some(path)) => (read_reference_file(path).await?, None),
        (None, None) => return Ok(()),
    };
    let image = image_processing::reference_image_from_bytes(bytes, declared.as_deref()).map_err(|err| {
        McpError::invalid_params(
            "invalid reference image",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    form.set_reference_image(image);
    Ok(())
}
