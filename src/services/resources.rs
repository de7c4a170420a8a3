//=========================================================================
// Resource Loader
//=========================================================================
//
// Loads images and resolves fonts, caching every result.
//
// Paths are relative to the asset root. A path that runs through a zip
// archive (`bundle.zip/images/gombo.png`) is read from inside the
// archive, so the appliance can ship its assets as one file.
//
// Failed loads are cached as well: a missing sprite is reported once and
// then drawn as a placeholder every frame without touching the disk.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use image::RgbaImage;
use log::{debug, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::render::{Font, FontStyle};

//=== Types ===============================================================

/// Shared, decoded RGBA image.
pub type ImageHandle = Rc<RgbaImage>;

const ARCHIVE_MARKER: &str = ".zip/";

//=== ResourceError =======================================================

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

//=== ResourceLoader ======================================================

pub struct ResourceLoader {
    root: PathBuf,
    images: HashMap<(String, u32, u32), Option<ImageHandle>>,
    fonts: HashMap<(FontStyle, u32), Font>,
}

impl ResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    //--- Images -----------------------------------------------------------

    /// Returns the image at `path` resized to `width` x `height`, or
    /// `None` if it cannot be loaded. Failures are logged once.
    pub fn load_image(&mut self, path: &str, width: u32, height: u32) -> Option<ImageHandle> {
        let key = (path.to_string(), width, height);
        if let Some(cached) = self.images.get(&key) {
            return cached.clone();
        }

        let loaded = match self.decode_image(path, width, height) {
            Ok(image) => {
                debug!("Image loaded: {} ({}x{})", path, width, height);
                Some(Rc::new(image))
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        self.images.insert(key, loaded.clone());
        loaded
    }

    fn decode_image(&self, path: &str, width: u32, height: u32) -> Result<RgbaImage, ResourceError> {
        let bytes = self.read_bytes(path)?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| ResourceError::Decode {
            path: PathBuf::from(path),
            source,
        })?;
        let rgba = decoded.to_rgba8();

        if rgba.dimensions() == (width, height) {
            return Ok(rgba);
        }
        Ok(image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle))
    }

    //--- Fonts ------------------------------------------------------------

    /// Resolves a font style and pixel size to the nearest built-in face.
    pub fn load_font(&mut self, style: FontStyle, size: u32) -> Font {
        *self
            .fonts
            .entry((style, size))
            .or_insert_with(|| Font::resolve(style, size))
    }

    //--- Raw Access -------------------------------------------------------

    /// Reads a resource from the asset directory or from inside a zip
    /// archive named in the path.
    pub fn read_bytes(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full = self.root.join(path);
        if full.is_file() {
            return std::fs::read(&full).map_err(|source| ResourceError::Io { path: full, source });
        }

        let unified = full.to_string_lossy().replace('\\', "/");
        match unified.split_once(ARCHIVE_MARKER) {
            Some((archive, inner)) => {
                read_from_archive(Path::new(&format!("{}.zip", archive)), &normalize_entry(inner))
            }
            None => Err(ResourceError::NotFound(full)),
        }
    }
}

//=== Archive Helpers =====================================================

fn read_from_archive(archive_path: &Path, entry: &str) -> Result<Vec<u8>, ResourceError> {
    let archive_err = |source| ResourceError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(archive_path).map_err(|source| ResourceError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(archive_err)?;

    let mut zip_entry = match archive.by_name(entry) {
        Ok(zip_entry) => zip_entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ResourceError::NotFound(archive_path.join(entry)));
        }
        Err(e) => return Err(archive_err(e)),
    };

    let mut buffer = Vec::with_capacity(zip_entry.size() as usize);
    zip_entry.read_to_end(&mut buffer).map_err(|source| ResourceError::Io {
        path: archive_path.join(entry),
        source,
    })?;
    Ok(buffer)
}

/// Collapses `.` and `..` segments of an archive entry name.
fn normalize_entry(entry: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            _ => {}
        }
    }
    parts.join("/")
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_png(path: &Path, width: u32, height: u32) {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
        image.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 255, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn loads_and_resizes_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("images")).unwrap();
        write_png(&dir.path().join("images/gombo.png"), 8, 8);

        let mut loader = ResourceLoader::new(dir.path());
        let image = loader.load_image("images/gombo.png", 16, 12).unwrap();

        assert_eq!(image.dimensions(), (16, 12));
    }

    #[test]
    fn repeated_loads_share_the_cached_image() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("a.png"), 4, 4);
        let mut loader = ResourceLoader::new(dir.path());

        let first = loader.load_image("a.png", 4, 4).unwrap();
        std::fs::remove_file(dir.path().join("a.png")).unwrap();
        let second = loader.load_image("a.png", 4, 4).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_image_is_none_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ResourceLoader::new(dir.path());

        assert!(loader.load_image("nope.png", 4, 4).is_none());
        write_png(&dir.path().join("nope.png"), 4, 4);
        assert!(loader.load_image("nope.png", 4, 4).is_none());
    }

    #[test]
    fn reads_entries_inside_zip_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");
        {
            let file = std::fs::File::create(&archive_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file("images/magui.png", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(&png_bytes(6, 6)).unwrap();
            writer.finish().unwrap();
        }

        let mut loader = ResourceLoader::new(dir.path());
        let image = loader.load_image("bundle.zip/images/../images/magui.png", 6, 6).unwrap();

        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert!(matches!(
            loader.read_bytes("bundle.zip/images/absent.png"),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn fonts_resolve_to_built_in_faces() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = ResourceLoader::new(dir.path());
        let font = loader.load_font(FontStyle::Bold, 13);
        assert_eq!(font.line_height(), Font::resolve(FontStyle::Bold, 13).line_height());
    }

    #[test]
    fn entry_names_are_normalized() {
        assert_eq!(normalize_entry("./a/../b/c.png"), "b/c.png");
        assert_eq!(normalize_entry("images/x.png"), "images/x.png");
    }
}
