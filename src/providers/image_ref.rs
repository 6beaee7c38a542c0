//! Image reference parsing
//!
//! Clients attach images as data URLs, bare base64 strings or remote
//! http(s) URLs.

/// MIME type assumed for bare base64 payloads
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// An inline image split into MIME type and base64 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

impl<'a> InlineImage<'a> {
    /// Parse `data:<mime>;base64,<payload>` or a bare base64 string
    pub fn parse(image_ref: &'a str) -> Self {
        let trimmed = image_ref.trim();
        if let Some(rest) = trimmed.strip_prefix("data:") {
            if let Some((meta, data)) = rest.split_once(',') {
                let mime_type = meta
                    .split(';')
                    .next()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_IMAGE_MIME);
                return Self { mime_type, data };
            }
        }
        Self {
            mime_type: DEFAULT_IMAGE_MIME,
            data: trimmed,
        }
    }

    /// Render as a data URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// True for `http://` and `https://` references
pub fn is_remote_url(image_ref: &str) -> bool {
    let trimmed = image_ref.trim();
    trimmed.starts_with("http://") || trimmed.starts_with("https://")
}

/// MIME type implied by a remote URL's file extension
pub fn remote_mime_type(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => DEFAULT_IMAGE_MIME,
    }
}

/// URL form accepted by OpenAI-style `image_url` parts
///
/// Remote URLs pass through; anything else becomes a data URL.
pub fn to_image_url(image_ref: &str) -> String {
    let trimmed = image_ref.trim();
    if is_remote_url(trimmed) || trimmed.starts_with("data:") {
        trimmed.to_string()
    } else {
        InlineImage::parse(trimmed).to_data_url()
    }
}
