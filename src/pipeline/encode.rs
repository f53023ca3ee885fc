//! Image encoding helpers: base64 wrapping and size-aware downscaling.
//!
//! These helpers never return an error. A missing file or a decode failure is
//! logged at ERROR level and reported as `None`, leaving the caller to decide
//! whether to continue without the image.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, error, info};

/// One mebibyte, the unit of every `max_size_mb` argument.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Fraction of the byte budget targeted when downscaling.
pub const RESIZE_SAFETY_FACTOR: f64 = 0.9;

/// Quality used when re-encoding to JPEG.
pub const JPEG_QUALITY: u8 = 85;

/// Read a file and return its contents as standard base64.
///
/// Returns `None` (after logging) if the file is missing or unreadable.
pub fn encode_image(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => {
            let b64 = STANDARD.encode(&bytes);
            debug!("Encoded {} → {} bytes base64", path.display(), b64.len());
            Some(b64)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("File not found: {}", path.display());
            None
        }
        Err(e) => {
            error!("Error encoding image {}: {}", path.display(), e);
            None
        }
    }
}

/// Return the image bytes, downscaled if the file is larger than `max_size_mb`.
///
/// Files at or under the threshold are returned byte-for-byte. Larger files
/// are scaled uniformly by [`scale_factor`], resampled with Lanczos3 and
/// re-encoded as `output_format` (JPEG at quality [`JPEG_QUALITY`]).
///
/// The scale is a single-pass estimate: compressed size depends on content,
/// so the result is not guaranteed to land under the threshold.
pub fn resize_image_if_needed(
    path: impl AsRef<Path>,
    max_size_mb: f64,
    output_format: ImageFormat,
) -> Option<Vec<u8>> {
    let path = path.as_ref();
    let original_size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            error!("Cannot stat image {}: {}", path.display(), e);
            return None;
        }
    };

    let limit = max_size_mb * BYTES_PER_MB;
    if original_size as f64 <= limit {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!("Error reading image {}: {}", path.display(), e);
                None
            }
        };
    }

    info!(
        "Resizing image {} ({:.2}MB) to fit under {}MB.",
        path.display(),
        original_size as f64 / BYTES_PER_MB,
        max_size_mb
    );

    match downscale(path, scale_factor(original_size, limit), output_format) {
        Ok(bytes) => {
            debug!(
                "Resized {}: {} → {} bytes",
                path.display(),
                original_size,
                bytes.len()
            );
            Some(bytes)
        }
        Err(e) => {
            error!("Error resizing image {}: {}", path.display(), e);
            None
        }
    }
}

/// Uniform per-axis scale: `sqrt(limit * 0.9 / original)`.
pub fn scale_factor(original_size: u64, limit_bytes: f64) -> f64 {
    ((limit_bytes * RESIZE_SAFETY_FACTOR) / original_size as f64).sqrt()
}

/// Apply `scale` to both axes, truncating and never going below 1 px.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = ((width as f64 * scale) as u32).max(1);
    let h = ((height as f64 * scale) as u32).max(1);
    (w, h)
}

/// Build a `data:` URI for raw image bytes, sniffing the MIME type.
///
/// Returns `None` when the bytes are not a recognised image format.
pub fn image_data_url(bytes: &[u8]) -> Option<String> {
    match image::guess_format(bytes) {
        Ok(format) => Some(format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(bytes)
        )),
        Err(e) => {
            error!("Unrecognised image data: {}", e);
            None
        }
    }
}

fn downscale(
    path: &Path,
    scale: f64,
    output_format: ImageFormat,
) -> Result<Vec<u8>, image::ImageError> {
    let img = image::open(path)?;
    let (w, h) = scaled_dimensions(img.width(), img.height(), scale);
    debug!(
        "Scaling {}x{} → {}x{} (factor {:.3})",
        img.width(),
        img.height(),
        w,
        h,
        scale
    );
    let resized = img.resize_exact(w, h, FilterType::Lanczos3);
    encode_as(&resized, output_format)
}

fn encode_as(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    if format == ImageFormat::Jpeg {
        // JPEG has no alpha channel.
        let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    } else {
        img.write_to(&mut Cursor::new(&mut buf), format)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    /// Deterministic noise so PNG cannot compress it much.
    fn noisy_png(dir: &Path, name: &str, w: u32, h: u32) -> std::path::PathBuf {
        let mut state: u32 = 0x1234_5678;
        let img = RgbImage::from_fn(w, h, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let [a, b, c, _] = state.to_le_bytes();
            Rgb([a, b, c])
        });
        let path = dir.join(name);
        img.save(&path).expect("save png");
        path
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn encode_missing_file_logs_error_and_returns_none() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            encode_image("/definitely/not/here.png")
        });

        assert!(result.is_none());
        let out = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("ERROR"), "logs: {out}");
        assert!(out.contains("File not found: /definitely/not/here.png"), "logs: {out}");
    }

    #[test]
    fn encode_existing_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, b"\x89PNG fake bytes").unwrap();

        let b64 = encode_image(&path).expect("encode should succeed");
        assert_eq!(STANDARD.decode(b64).unwrap(), b"\x89PNG fake bytes");
    }

    #[test]
    fn small_image_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = noisy_png(dir.path(), "small.png", 16, 16);
        let raw = std::fs::read(&path).unwrap();

        let out = resize_image_if_needed(&path, 5.0, ImageFormat::Jpeg).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn file_exactly_at_threshold_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = noisy_png(dir.path(), "exact.png", 32, 32);
        let raw = std::fs::read(&path).unwrap();
        let threshold_mb = raw.len() as f64 / BYTES_PER_MB;

        let out = resize_image_if_needed(&path, threshold_mb, ImageFormat::Jpeg).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn large_image_is_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = noisy_png(dir.path(), "large.png", 300, 300);
        let original = std::fs::metadata(&path).unwrap().len();
        let max_mb = 0.05;
        assert!(original as f64 > max_mb * BYTES_PER_MB, "fixture too small");

        let out = resize_image_if_needed(&path, max_mb, ImageFormat::Jpeg).unwrap();
        assert!((out.len() as u64) < original);

        let decoded = image::load_from_memory_with_format(&out, ImageFormat::Jpeg).unwrap();
        let expected = scaled_dimensions(300, 300, scale_factor(original, max_mb * BYTES_PER_MB));
        assert_eq!(decoded.dimensions(), expected);
        assert!(expected.0 < 300);
    }

    #[test]
    fn large_image_can_be_reencoded_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = noisy_png(dir.path(), "large.png", 200, 100);
        let out = resize_image_if_needed(&path, 0.01, ImageFormat::Png).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&out).unwrap();
        assert!(decoded.width() < 200 && decoded.height() < 100);
    }

    #[test]
    fn resize_missing_file_returns_none() {
        assert!(resize_image_if_needed("/nope/missing.jpg", 1.0, ImageFormat::Jpeg).is_none());
    }

    #[test]
    fn resize_undecodable_large_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();
        assert!(resize_image_if_needed(&path, 0.001, ImageFormat::Jpeg).is_none());
    }

    #[test]
    fn scale_factor_follows_square_root_rule() {
        let limit = 5.0 * BYTES_PER_MB;
        let original = (limit * 0.9 * 4.0) as u64;
        let s = scale_factor(original, limit);
        assert!((s - 0.5).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn scaled_dimensions_never_reach_zero() {
        assert_eq!(scaled_dimensions(1000, 3, 0.1), (100, 1));
    }

    #[test]
    fn data_url_uses_sniffed_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = noisy_png(dir.path(), "tiny.png", 4, 4);
        let bytes = std::fs::read(&path).unwrap();
        let url = image_data_url(&bytes).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn data_url_rejects_non_images() {
        assert!(image_data_url(b"plain text, not an image").is_none());
    }
}
