use anyhow::{Result, anyhow, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{GenericImageView, ImageFormat};

use crate::models::ReferenceImage;

pub fn get_dimensions(bytes: &[u8], mime_type: &str) -> Result<(u32, u32)> {
    let format = mime_to_format(mime_type)?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|err| anyhow!("decode image failed: {err}"))?;
    Ok(image.dimensions())
}

pub fn detect_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }
    None
}

pub fn mime_to_format(mime_type: &str) -> Result<ImageFormat> {
    match mime_type {
        "image/png" => Ok(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
        "image/gif" => Ok(ImageFormat::Gif),
        "image/webp" => Ok(ImageFormat::WebP),
        "image/bmp" => Ok(ImageFormat::Bmp),
        _ => Err(anyhow!("unsupported mime type: {mime_type}")),
    }
}

pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Splits a `data:<mime>;base64,<payload>` URL into media type and decoded bytes.
pub fn parse_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data url"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data url has no payload"))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| anyhow!("data url is not base64 encoded"))?;
    let mime_type = if mime_type.is_empty() { "image/png" } else { mime_type };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|err| anyhow!("invalid base64 payload: {err}"))?;
    Ok((mime_type.to_string(), bytes))
}

/// Validates raw upload bytes and turns them into a form reference image.
/// Magic bytes win over the declared media type.
pub fn reference_image_from_bytes(bytes: Vec<u8>, declared_mime: Option<&str>) -> Result<ReferenceImage> {
    if bytes.is_empty() {
        bail!("file is empty");
    }
    let declared = declared_mime
        .map(|value| value.split(';').next().unwrap_or(value).trim().to_lowercase())
        .filter(|value| !value.is_empty());
    if let Some(declared) = declared.as_deref() {
        if !declared.starts_with("image/") {
            bail!("unsupported file type: {declared}");
        }
    }
    let mime_type = detect_mime_type(&bytes)
        .map(str::to_string)
        .or(declared)
        .ok_or_else(|| anyhow!("unrecognized image format"))?;
    let (width, height) = get_dimensions(&bytes, &mime_type)?;
    tracing::debug!(%mime_type, width, height, size = bytes.len(), "accepted reference image");
    let preview = to_data_url(&mime_type, &bytes);
    Ok(ReferenceImage {
        bytes,
        mime_type,
        preview,
    })
}
