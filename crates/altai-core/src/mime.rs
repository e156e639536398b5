//! MIME type lookup from an image URL's file extension.

/// Fallback for unknown or missing extensions.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess the MIME type of an image from the extension in its URL.
///
/// Takes whatever follows the last `.`, lowercases it, and cuts it at the
/// first `#` or `?`. Never fails: anything unrecognized maps to
/// [`DEFAULT_MIME_TYPE`].
pub fn mime_from_url(url: &str) -> &'static str {
    let tail = url.rsplit('.').next().unwrap_or_default().to_lowercase();
    let extension = tail.split(['#', '?']).next().unwrap_or_default();

    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" | "svgz" => "image/svg+xml",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        "ico" | "cur" => "image/x-icon",
        _ => DEFAULT_MIME_TYPE,
    }
}
