use crate::models::ImagePayload;
use crate::Result;
use base64::Engine as _;
use std::path::Path;

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
                &bytes[..bytes.len().min(4)]
            );
            "image/png"
        }
    }
}

/// Raw image bytes to the base64 payload the API expects.
pub fn encode_image_bytes(bytes: &[u8]) -> ImagePayload {
    ImagePayload::new(
        base64::engine::general_purpose::STANDARD.encode(bytes),
        detect_image_mime(bytes),
    )
}

pub async fn encode_image_file(path: &Path) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(encode_image_bytes(&bytes))
}

pub fn decode_image_data(data: &str) -> Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(data.trim())?)
}
