//! Build-time recompression of the static images served from `public/`.
//!
//! Every supported image is backed up once to `<file>.backup`, downscaled to
//! [`CompressSettings::max_width`] when wider, re-encoded and swapped in only
//! when the result is strictly smaller. Running it again is a no-op.

use std::{
    ffi::OsString,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType as PngFilter, PngEncoder},
        webp::WebPEncoder,
    },
    imageops::FilterType,
    ColorType, DynamicImage, ImageFormat,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const BACKUP_SUFFIX: &str = ".backup";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Clone)]
pub struct CompressSettings {
    pub root: PathBuf,
    pub quality: u8,
    pub max_width: u32,
    pub batch_size: usize,
    pub extensions: &'static [&'static str],
}

impl Default for CompressSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            quality: 75,
            max_width: 1920,
            batch_size: 10,
            extensions: &["jpg", "jpeg", "png", "webp"],
        }
    }
}

impl CompressSettings {
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                self.extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(e))
            })
            .unwrap_or(false)
    }
}

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{}: unsupported image type", .0.display())]
    Unsupported(PathBuf),
    #[error("no encoder/decoder compiled in for .{0} images")]
    MissingCapability(String),
    #[error("asset directory {} does not exist", .0.display())]
    MissingRoot(PathBuf),
}

impl CompressError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn image(path: &Path, source: image::ImageError) -> Self {
        Self::Image {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Compressed,
    AlreadyOptimized,
    /// A downscaled WebP came out larger after the lossless re-encode; the
    /// original stays, still wider than the limit.
    KeptLossless,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub path: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl Summary {
    fn add(&mut self, outcome: &Outcome) {
        self.processed += 1;
        self.original_bytes += outcome.original_size;
        self.compressed_bytes += outcome.compressed_size;
    }

    pub fn saved_bytes(&self) -> u64 {
        self.original_bytes.saturating_sub(self.compressed_bytes)
    }

    pub fn percent_saved(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.saved_bytes() as f64 / self.original_bytes as f64 * 100.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed {} images ({} failed)", self.processed, self.failed)?;
        writeln!(f, "Original size:   {}", human_size(self.original_bytes))?;
        writeln!(f, "Compressed size: {}", human_size(self.compressed_bytes))?;
        write!(
            f,
            "Saved {} ({:.1}%)",
            human_size(self.saved_bytes()),
            self.percent_saved()
        )
    }
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, BACKUP_SUFFIX)
}

/// Fails fast when the `image` build lacks a codec for one of the configured extensions.
pub fn check_capabilities(settings: &CompressSettings) -> Result<(), CompressError> {
    for ext in settings.extensions {
        let supported = ImageFormat::from_extension(ext)
            .map(|f| f.reading_enabled() && f.writing_enabled())
            .unwrap_or(false);
        if !supported {
            return Err(CompressError::MissingCapability(ext.to_string()));
        }
    }
    Ok(())
}

/// Recursively collects supported images under `root`, sorted by path.
pub fn find_images(root: &Path, settings: &CompressSettings) -> Result<Vec<PathBuf>, CompressError> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| CompressError::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CompressError::io(&dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| CompressError::io(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && settings.is_supported(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Copies `path` to its `.backup` sibling unless one already exists.
/// Returns whether a new backup was written.
pub fn ensure_backup(path: &Path) -> Result<bool, CompressError> {
    let backup = backup_path(path);
    if backup.exists() {
        return Ok(false);
    }
    fs::copy(path, &backup).map_err(|e| CompressError::io(&backup, e))?;
    Ok(true)
}

/// Dimensions after capping the width at `max_width`, or `None` when no resize is needed.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width <= max_width || width == 0 {
        return None;
    }
    let h = (height as f64 * max_width as f64 / width as f64).round() as u32;
    Some((max_width, h.max(1)))
}

fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    path: &Path,
) -> Result<Vec<u8>, CompressError> {
    let mut buf = Vec::new();
    let res = match format {
        ImageFormat::Jpeg => {
            let img = match img.color() {
                ColorType::L8 | ColorType::Rgb8 => img.clone(),
                _ => DynamicImage::ImageRgb8(img.to_rgb8()),
            };
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        }
        ImageFormat::Png => img.write_with_encoder(PngEncoder::new_with_quality(
            &mut buf,
            CompressionType::Best,
            PngFilter::Adaptive,
        )),
        ImageFormat::WebP => {
            let img = match img.color() {
                ColorType::Rgb8 | ColorType::Rgba8 => img.clone(),
                _ => DynamicImage::ImageRgba8(img.to_rgba8()),
            };
            img.write_with_encoder(WebPEncoder::new_lossless(&mut buf))
        }
        _ => return Err(CompressError::Unsupported(path.to_path_buf())),
    };
    res.map_err(|e| CompressError::image(path, e))?;
    Ok(buf)
}

/// Status for an encoding that did not beat the file on disk.
fn not_smaller_status(format: ImageFormat, resized: bool) -> Status {
    if resized && format == ImageFormat::WebP {
        Status::KeptLossless
    } else {
        Status::AlreadyOptimized
    }
}

/// Recompresses one image in place. The original is only replaced by a
/// strictly smaller encoding, written to a temp sibling and renamed over it.
///
/// A file that no longer matches its `.backup` has been through here before
/// and is left alone, so lossy formats do not lose quality on every run.
pub fn compress_file(path: &Path, settings: &CompressSettings) -> Result<Outcome, CompressError> {
    let format =
        ImageFormat::from_path(path).map_err(|_| CompressError::Unsupported(path.to_path_buf()))?;

    let created = ensure_backup(path)?;
    if created {
        debug!(path = %path.display(), "Created backup");
    }

    let original = fs::read(path).map_err(|e| CompressError::io(path, e))?;
    let original_size = original.len() as u64;
    let unchanged = Outcome {
        path: path.to_path_buf(),
        original_size,
        compressed_size: original_size,
        status: Status::AlreadyOptimized,
    };

    if !created {
        let backup = backup_path(path);
        let pristine = fs::read(&backup).map_err(|e| CompressError::io(&backup, e))?;
        if pristine != original {
            return Ok(unchanged);
        }
    }

    let mut img = image::load_from_memory_with_format(&original, format)
        .map_err(|e| CompressError::image(path, e))?;
    let resized = target_dimensions(img.width(), img.height(), settings.max_width);
    if let Some((w, h)) = resized {
        debug!(path = %path.display(), from = img.width(), to = w, "Downscaling");
        img = img.resize_exact(w, h, FilterType::Lanczos3);
    }

    let encoded = encode(&img, format, settings.quality, path)?;
    let compressed_size = encoded.len() as u64;

    if compressed_size >= original_size {
        return Ok(Outcome {
            status: not_smaller_status(format, resized.is_some()),
            ..unchanged
        });
    }

    let tmp = with_suffix(path, TEMP_SUFFIX);
    fs::write(&tmp, &encoded).map_err(|e| CompressError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(CompressError::io(path, e));
    }

    Ok(Outcome {
        path: path.to_path_buf(),
        original_size,
        compressed_size,
        status: Status::Compressed,
    })
}

fn log_outcome(outcome: &Outcome) {
    match outcome.status {
        Status::Compressed => {
            let saved = outcome.original_size - outcome.compressed_size;
            info!(
                path = %outcome.path.display(),
                "{} -> {} (saved {:.1}%)",
                human_size(outcome.original_size),
                human_size(outcome.compressed_size),
                saved as f64 / outcome.original_size as f64 * 100.0
            );
        }
        Status::AlreadyOptimized => {
            info!(path = %outcome.path.display(), "already optimized");
        }
        Status::KeptLossless => {
            warn!(
                path = %outcome.path.display(),
                "kept, lossless re-encode larger (not downscaled)"
            );
        }
    }
}

/// Compresses every image under `settings.root`, `batch_size` files at a time.
/// A failing file is logged and counted; it never stops the run.
pub async fn run(settings: CompressSettings) -> Result<Summary, CompressError> {
    if !settings.root.is_dir() {
        return Err(CompressError::MissingRoot(settings.root.clone()));
    }
    let files = find_images(&settings.root, &settings)?;
    info!(count = files.len(), root = %settings.root.display(), "Found images");

    let mut summary = Summary::default();
    for (i, batch) in files.chunks(settings.batch_size.max(1)).enumerate() {
        debug!(batch = i + 1, size = batch.len(), "Starting batch");
        let mut set = JoinSet::new();
        for path in batch {
            let path = path.clone();
            let settings = settings.clone();
            set.spawn_blocking(move || compress_file(&path, &settings));
        }
        while let Some(res) = set.join_next().await {
            match res {
                Ok(Ok(outcome)) => {
                    log_outcome(&outcome);
                    summary.add(&outcome);
                }
                Ok(Err(err)) => {
                    error!("Failed to compress {err}");
                    summary.failed += 1;
                }
                Err(err) => {
                    error!("Compression task aborted: {err}");
                    summary.failed += 1;
                }
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn noisy(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 7919 + y * 104729) % 251) as u8,
                ((x ^ y).wrapping_mul(31) % 256) as u8,
                ((x * y) % 253) as u8,
            ])
        }))
    }

    fn write_jpeg(path: &Path, img: &DynamicImage, quality: u8) {
        let mut buf = Vec::new();
        img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
            .unwrap();
        fs::write(path, buf).unwrap();
    }

    fn write_webp(path: &Path, img: &DynamicImage) {
        let mut buf = Vec::new();
        img.write_with_encoder(WebPEncoder::new_lossless(&mut buf))
            .unwrap();
        fs::write(path, buf).unwrap();
    }

    fn backup_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(BACKUP_SUFFIX))
            .count()
    }

    #[test]
    fn test_target_dimensions() {
        assert_eq!(target_dimensions(1920, 1080, 1920), None);
        assert_eq!(target_dimensions(800, 600, 1920), None);
        assert_eq!(target_dimensions(3840, 2160, 1920), Some((1920, 1080)));
        assert_eq!(target_dimensions(2400, 100, 1920), Some((1920, 80)));
        assert_eq!(target_dimensions(100_000, 1, 1920), Some((1920, 1)));
    }

    #[test]
    fn test_find_images() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("img/nested")).unwrap();
        for name in [
            "a.jpg",
            "img/b.PNG",
            "img/nested/c.webp",
            "img/nested/d.jpeg",
            "img/nested/d.jpeg.backup",
            "notes.txt",
            "favicon.ico",
        ] {
            fs::write(root.join(name), b"x").unwrap();
        }
        let settings = CompressSettings::default();
        let found = find_images(root, &settings).unwrap();
        let names = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["a.jpg", "img/b.PNG", "img/nested/c.webp", "img/nested/d.jpeg"]
        );
    }

    #[test]
    fn test_backup_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, b"first").unwrap();
        assert!(ensure_backup(&path).unwrap());
        fs::write(&path, b"second").unwrap();
        assert!(!ensure_backup(&path).unwrap());
        assert_eq!(fs::read(backup_path(&path)).unwrap(), b"first");
        assert_eq!(backup_path(&path), dir.path().join("photo.jpg.backup"));
    }

    #[test]
    fn test_wide_jpeg_is_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.jpg");
        write_jpeg(&path, &noisy(2400, 300), 100);
        let before = fs::read(&path).unwrap();

        let outcome = compress_file(&path, &CompressSettings::default()).unwrap();
        assert_eq!(outcome.status, Status::Compressed);
        assert_eq!(outcome.original_size, before.len() as u64);
        assert!(outcome.compressed_size < outcome.original_size);

        let after = image::open(&path).unwrap();
        assert_eq!((after.width(), after.height()), (1920, 240));
        assert_eq!(fs::read(backup_path(&path)).unwrap(), before);
        assert!(!with_suffix(&path, TEMP_SUFFIX).exists());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        noisy(64, 64).save(&path).unwrap();
        let original = fs::read(&path).unwrap();
        let settings = CompressSettings::default();

        let first = compress_file(&path, &settings).unwrap();
        assert!(first.compressed_size <= first.original_size);
        let after_first = fs::read(&path).unwrap();

        let second = compress_file(&path, &settings).unwrap();
        assert_eq!(second.status, Status::AlreadyOptimized);
        assert_eq!(second.compressed_size, second.original_size);
        assert_eq!(fs::read(&path).unwrap(), after_first);

        // the backup still holds the very first version
        assert_eq!(fs::read(backup_path(&path)).unwrap(), original);
        assert_eq!(backup_count(dir.path()), 1);
    }

    #[test]
    fn test_jpeg_second_pass_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CompressSettings::default();
        // one that gets downscaled, one that only gets re-encoded
        for (name, width, height) in [("wide.jpg", 2400, 300), ("photo.jpeg", 640, 480)] {
            let path = dir.path().join(name);
            write_jpeg(&path, &noisy(width, height), 100);
            let original = fs::read(&path).unwrap();

            let first = compress_file(&path, &settings).unwrap();
            assert_eq!(first.status, Status::Compressed);
            let after_first = fs::read(&path).unwrap();

            for _ in 0..2 {
                let again = compress_file(&path, &settings).unwrap();
                assert_eq!(again.status, Status::AlreadyOptimized);
                assert_eq!(again.compressed_size, again.original_size);
                assert_eq!(fs::read(&path).unwrap(), after_first);
            }
            assert_eq!(fs::read(backup_path(&path)).unwrap(), original);
        }
        assert_eq!(backup_count(dir.path()), 2);
    }

    #[test]
    fn test_webp_second_pass_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge.webp");
        write_webp(&path, &noisy(64, 64));
        let original = fs::read(&path).unwrap();
        let settings = CompressSettings::default();

        let first = compress_file(&path, &settings).unwrap();
        assert_eq!(first.status, Status::AlreadyOptimized);
        let second = compress_file(&path, &settings).unwrap();
        assert_eq!(second.status, Status::AlreadyOptimized);
        assert_eq!(fs::read(&path).unwrap(), original);
        assert_eq!(backup_count(dir.path()), 1);
    }

    #[test]
    fn test_wide_webp_is_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.webp");
        write_webp(&path, &noisy(2400, 200));

        let outcome = compress_file(&path, &CompressSettings::default()).unwrap();
        assert_eq!(outcome.status, Status::Compressed);
        assert!(outcome.compressed_size < outcome.original_size);
        let after = image::open(&path).unwrap();
        assert_eq!((after.width(), after.height()), (1920, 160));

        let again = compress_file(&path, &CompressSettings::default()).unwrap();
        assert_eq!(again.status, Status::AlreadyOptimized);
    }

    #[test]
    fn test_not_smaller_status() {
        assert_eq!(
            not_smaller_status(ImageFormat::WebP, true),
            Status::KeptLossless
        );
        assert_eq!(
            not_smaller_status(ImageFormat::WebP, false),
            Status::AlreadyOptimized
        );
        assert_eq!(
            not_smaller_status(ImageFormat::Jpeg, true),
            Status::AlreadyOptimized
        );
        assert_eq!(
            not_smaller_status(ImageFormat::Png, true),
            Status::AlreadyOptimized
        );
    }

    #[test]
    fn test_never_grows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.jpg");
        // already low quality, re-encoding at 75 will not help
        write_jpeg(&path, &noisy(16, 16), 10);
        let before = fs::read(&path).unwrap();

        let outcome = compress_file(&path, &CompressSettings::default()).unwrap();
        let after = fs::read(&path).unwrap();
        assert!(after.len() <= before.len());
        if outcome.status == Status::AlreadyOptimized {
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_check_capabilities() {
        assert!(check_capabilities(&CompressSettings::default()).is_ok());
        let settings = CompressSettings {
            extensions: &["png", "xyz"],
            ..Default::default()
        };
        assert!(matches!(
            check_capabilities(&settings),
            Err(CompressError::MissingCapability(ext)) if ext == "xyz"
        ));
    }

    #[test]
    fn test_summary() {
        let mut summary = Summary::default();
        assert_eq!(summary.percent_saved(), 0.0);
        summary.add(&Outcome {
            path: PathBuf::from("a.jpg"),
            original_size: 1000,
            compressed_size: 250,
            status: Status::Compressed,
        });
        summary.add(&Outcome {
            path: PathBuf::from("b.png"),
            original_size: 1000,
            compressed_size: 1000,
            status: Status::AlreadyOptimized,
        });
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.saved_bytes(), 750);
        assert_eq!(summary.percent_saved(), 37.5);
        let text = summary.to_string();
        assert!(text.contains("Processed 2 images (0 failed)"));
        assert!(text.contains("37.5%"));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.00 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[tokio::test]
    async fn test_run_survives_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::write(root.join("broken.jpg"), b"definitely not a jpeg").unwrap();
        for i in 0..12 {
            noisy(32, 32).save(root.join(format!("blog/{i}.png"))).unwrap();
        }
        write_jpeg(&root.join("wide.jpg"), &noisy(2400, 200), 100);

        let settings = CompressSettings {
            root: root.clone(),
            ..Default::default()
        };
        let summary = run(settings).await.unwrap();
        assert_eq!(summary.processed, 13);
        assert_eq!(summary.failed, 1);
        assert!(summary.compressed_bytes < summary.original_bytes);
        assert_eq!(image::open(root.join("wide.jpg")).unwrap().width(), 1920);
    }

    #[tokio::test]
    async fn test_run_requires_root() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CompressSettings {
            root: dir.path().join("missing"),
            ..Default::default()
        };
        assert!(matches!(
            run(settings).await,
            Err(CompressError::MissingRoot(_))
        ));
    }
}
