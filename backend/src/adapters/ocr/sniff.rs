//! Content-type detection from magic bytes. The type declared by the client
//! is never trusted.

use image::ImageFormat;

pub const ALLOWED_TYPES: &str = "image/jpeg, image/png, image/gif, image/webp, application/pdf";

const PDF_SIGNATURE: &[u8] = b"%PDF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image(ImageFormat),
}

impl FileKind {
    /// Classifies `bytes`, or returns `None` for anything that is not a PDF
    /// or one of the accepted image formats.
    pub fn sniff(bytes: &[u8]) -> Option<FileKind> {
        if bytes.starts_with(PDF_SIGNATURE) {
            return Some(FileKind::Pdf);
        }
        match image::guess_format(bytes) {
            Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP)) => {
                Some(FileKind::Image(format))
            }
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Image(format) => format.to_mime_type(),
        }
    }

    /// Short name used in logs: `pdf` or the image MIME type.
    pub fn label(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image(_) => self.mime_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn pdf_signature_wins() {
        let kind = FileKind::sniff(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n1 0 obj").unwrap();
        assert_eq!(kind, FileKind::Pdf);
        assert_eq!(kind.label(), "pdf");
        assert_eq!(kind.mime_type(), "application/pdf");
    }

    #[test]
    fn png_signature_is_an_image() {
        let kind = FileKind::sniff(PNG_HEADER).unwrap();
        assert_eq!(kind, FileKind::Image(ImageFormat::Png));
        assert_eq!(kind.label(), "image/png");
    }

    #[test]
    fn jpeg_gif_and_webp_are_accepted() {
        assert_eq!(
            FileKind::sniff(b"\xff\xd8\xff\xe0\0\x10JFIF\0").map(FileKind::mime_type),
            Some("image/jpeg")
        );
        assert_eq!(
            FileKind::sniff(b"GIF89a\x01\0\x01\0").map(FileKind::mime_type),
            Some("image/gif")
        );
        assert_eq!(
            FileKind::sniff(b"RIFF\x24\0\0\0WEBPVP8 ").map(FileKind::mime_type),
            Some("image/webp")
        );
    }

    #[test]
    fn unknown_bytes_are_rejected() {
        assert_eq!(FileKind::sniff(b"hello, world"), None);
        assert_eq!(FileKind::sniff(b"PK\x03\x04zipfile"), None);
        assert_eq!(FileKind::sniff(b""), None);
    }

    #[test]
    fn other_image_formats_are_rejected() {
        // BMP is a known image format but not one the extractor accepts.
        assert_eq!(FileKind::sniff(b"BM\x3a\0\0\0\0\0\0\0\x36\0\0\0"), None);
    }
}
