//! Image type detection from magic bytes.
//!
//! Remote `Content-Type` headers are not trusted; the body decides.

/// How far into the body to look for an `<svg` tag after a prologue.
const SVG_SCAN_LIMIT: usize = 1024;

/// Detect the MIME type of an image body, or `None` if it is not an image.
pub fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"\xFF\xD8\xFF") {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP") {
        Some("image/webp")
    } else if bytes.starts_with(b"\x00\x00\x01\x00") || bytes.starts_with(b"\x00\x00\x02\x00") {
        Some("image/x-icon")
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some("image/bmp")
    } else if is_svg(bytes) {
        Some("image/svg+xml")
    } else {
        None
    }
}

fn is_svg(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let head = &bytes[start..bytes.len().min(start + SVG_SCAN_LIMIT)];

    if head.starts_with(b"<svg") {
        return true;
    }

    // An XML declaration, comment or doctype may come first.
    let prologue = head.starts_with(b"<?xml")
        || head.starts_with(b"<!--")
        || head.starts_with(b"<!DOCTYPE svg");
    prologue && head.windows(4).any(|w| w == b"<svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_raster_formats() {
        assert_eq!(sniff_image(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), Some("image/png"));
        assert_eq!(sniff_image(b"\xFF\xD8\xFF\xE0\0\x10JFIF"), Some("image/jpeg"));
        assert_eq!(sniff_image(b"GIF89a\x01\0\x01\0"), Some("image/gif"));
        assert_eq!(sniff_image(b"RIFF\x24\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_image(b"\0\0\x01\0\x01\0\x10\x10"), Some("image/x-icon"));
        assert_eq!(sniff_image(b"BM\x36\0\0\0\0\0\0\0\x36\0\0\0\x28"), Some("image/bmp"));
    }

    #[test]
    fn sniff_svg() {
        assert_eq!(
            sniff_image(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
            Some("image/svg+xml")
        );
        assert_eq!(
            sniff_image(b"\xEF\xBB\xBF\n  <?xml version=\"1.0\"?>\n<svg></svg>"),
            Some("image/svg+xml")
        );
        assert_eq!(sniff_image(b"<!-- logo -->\n<svg></svg>"), Some("image/svg+xml"));
    }

    #[test]
    fn sniff_rejects_non_images() {
        assert_eq!(sniff_image(b""), None);
        assert_eq!(sniff_image(b"<!DOCTYPE html><html><body>Not Found</body></html>"), None);
        assert_eq!(sniff_image(b"<?xml version=\"1.0\"?><rss></rss>"), None);
        assert_eq!(sniff_image(b"{\"error\": \"nope\"}"), None);
        assert_eq!(sniff_image(b"BM"), None);
    }
}
