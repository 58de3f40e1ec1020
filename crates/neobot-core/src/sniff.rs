//! Magic-byte image format detection.
//!
//! Every entry point is total: unreadable sources classify as
//! [`ImageFormat::Unknown`] instead of returning an error.

use std::{
    fmt,
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

/// Number of leading bytes inspected.
pub const HEADER_LEN: usize = 64;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Unknown,
}

impl ImageFormat {
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
            ImageFormat::Unknown => "unknown",
        }
    }

    /// File extension for attachments; unknown data is sent as `.bin`.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Unknown => "bin",
            other => other.name(),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a pre-read header. Signatures are checked in a fixed order and
/// the first match wins.
pub fn sniff_header(header: &[u8]) -> ImageFormat {
    let h = &header[..header.len().min(HEADER_LEN)];

    if h.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return ImageFormat::Jpeg;
    }
    if h.starts_with(PNG_SIGNATURE) {
        return ImageFormat::Png;
    }
    if h.starts_with(b"GIF87a") || h.starts_with(b"GIF89a") {
        return ImageFormat::Gif;
    }
    if h.starts_with(b"BM") {
        return ImageFormat::Bmp;
    }
    if h.starts_with(b"RIFF") && contains(&h[..h.len().min(12)], b"WEBP") {
        return ImageFormat::Webp;
    }
    ImageFormat::Unknown
}

/// Peek at a seekable stream and put its position back afterwards.
pub fn sniff_reader<R: Read + Seek>(reader: &mut R) -> ImageFormat {
    let Ok(pos) = reader.stream_position() else {
        return ImageFormat::Unknown;
    };

    let header = read_header(reader);
    let restored = reader.seek(SeekFrom::Start(pos)).is_ok();

    match header {
        Some(h) if restored => sniff_header(&h),
        _ => ImageFormat::Unknown,
    }
}

/// Classify a non-seekable stream. Consumes up to [`HEADER_LEN`] bytes;
/// a read error means `Unknown`.
pub fn sniff_stream<R: Read>(reader: &mut R) -> ImageFormat {
    read_header(reader)
        .map(|h| sniff_header(&h))
        .unwrap_or(ImageFormat::Unknown)
}

/// Classify a file on disk; missing or unreadable files are `Unknown`.
pub fn sniff_path(path: impl AsRef<Path>) -> ImageFormat {
    let Ok(mut file) = File::open(path) else {
        return ImageFormat::Unknown;
    };
    sniff_stream(&mut file)
}

fn read_header<R: Read>(reader: &mut R) -> Option<Vec<u8>> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    reader
        .by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut buf)
        .ok()?;
    Some(buf)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    #[test]
    fn detects_minimal_headers() {
        assert_eq!(sniff_header(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageFormat::Jpeg);
        assert_eq!(sniff_header(PNG_SIGNATURE), ImageFormat::Png);
        assert_eq!(sniff_header(b"GIF87a"), ImageFormat::Gif);
        assert_eq!(sniff_header(b"GIF89a\x01\x00"), ImageFormat::Gif);
        assert_eq!(sniff_header(b"BM\x00\x00"), ImageFormat::Bmp);
        assert_eq!(sniff_header(b"RIFF\x24\x00\x00\x00WEBPVP8 "), ImageFormat::Webp);
    }

    #[test]
    fn empty_or_unrelated_bytes_are_unknown() {
        assert_eq!(sniff_header(b""), ImageFormat::Unknown);
        assert_eq!(sniff_header(b"hello world"), ImageFormat::Unknown);
        assert_eq!(sniff_header(&[0xFF, 0xD8]), ImageFormat::Unknown);
        // RIFF container that is not WebP (e.g. WAV).
        assert_eq!(sniff_header(b"RIFF\x24\x00\x00\x00WAVEfmt "), ImageFormat::Unknown);
        // WEBP marker beyond the first 12 bytes does not count.
        assert_eq!(sniff_header(b"RIFF\x00\x00\x00\x00\x00WEBP"), ImageFormat::Unknown);
    }

    #[test]
    fn truncated_png_signature_is_unknown() {
        assert_eq!(sniff_header(&PNG_SIGNATURE[..7]), ImageFormat::Unknown);
    }

    #[test]
    fn reader_position_is_restored() {
        let mut data = b"junk".to_vec();
        data.extend_from_slice(PNG_SIGNATURE);
        data.extend_from_slice(&[0u8; 100]);
        let mut cur = Cursor::new(data);

        cur.set_position(4);
        assert_eq!(sniff_reader(&mut cur), ImageFormat::Png);
        assert_eq!(cur.position(), 4);

        cur.set_position(0);
        assert_eq!(sniff_reader(&mut cur), ImageFormat::Unknown);
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn missing_file_is_unknown() {
        let p = std::env::temp_dir().join(format!("neobot-missing-{}.png", std::process::id()));
        let _ = std::fs::remove_file(&p);
        assert_eq!(sniff_path(&p), ImageFormat::Unknown);
    }

    #[test]
    fn reads_file_header() {
        let p = std::env::temp_dir().join(format!("neobot-sniff-{}.gif", std::process::id()));
        std::fs::write(&p, b"GIF89a rest of file").unwrap();
        assert_eq!(sniff_path(&p), ImageFormat::Gif);
        let _ = std::fs::remove_file(&p);
    }

    #[test]
    fn extensions() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Unknown.extension(), "bin");
    }

    /// Yields `prefix`, then fails every read.
    struct Flaky {
        prefix: &'static [u8],
        seekable: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.prefix.is_empty() {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
            }
            let n = self.prefix.len().min(buf.len());
            buf[..n].copy_from_slice(&self.prefix[..n]);
            self.prefix = &self.prefix[n..];
            Ok(n)
        }
    }

    impl Seek for Flaky {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            if self.seekable {
                Ok(0)
            } else {
                Err(io::Error::new(io::ErrorKind::Unsupported, "pipe"))
            }
        }
    }

    #[test]
    fn stream_without_seek_is_sniffed() {
        let mut pipe: &[u8] = b"GIF89a\x01\x00 and the rest of a pipe";
        assert_eq!(sniff_stream(&mut pipe), ImageFormat::Gif);

        let mut short: &[u8] = b"\xFF\xD8\xFF";
        assert_eq!(sniff_stream(&mut short), ImageFormat::Jpeg);
    }

    #[test]
    fn read_errors_are_unknown() {
        let mut broken = Flaky {
            prefix: PNG_SIGNATURE,
            seekable: true,
        };
        assert_eq!(sniff_stream(&mut broken), ImageFormat::Unknown);

        let mut broken = Flaky {
            prefix: PNG_SIGNATURE,
            seekable: true,
        };
        assert_eq!(sniff_reader(&mut broken), ImageFormat::Unknown);

        // Position cannot be queried or restored.
        let mut pipe = Flaky {
            prefix: PNG_SIGNATURE,
            seekable: false,
        };
        assert_eq!(sniff_reader(&mut pipe), ImageFormat::Unknown);
    }
}
