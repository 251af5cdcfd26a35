use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

/// One texture per demo view, with room to spare
const DEFAULT_MAX_TEXTURES: usize = 8;

/// Errors that can occur while uploading a view's image
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureError {
    #[error("Refusing to upload an empty {width}x{height} image for {key}")]
    EmptyImage {
        key: &'static str,
        width: usize,
        height: usize,
    },
}

/// Surfaces are one pixel per point and get stretched on HiDPI screens
const TEXTURE_OPTIONS: TextureOptions = TextureOptions::LINEAR;

fn checked(key: &'static str, image: ColorImage) -> Result<ColorImage, TextureError> {
    let [width, height] = image.size;
    if width == 0 || height == 0 {
        return Err(TextureError::EmptyImage { key, width, height });
    }
    Ok(image)
}

struct CachedTexture {
    handle: TextureHandle,
    version: u64,
    last_used: u64,
}

/// Keeps one GPU texture per view and only re-uploads when the view's version changes
pub struct TextureCache {
    textures: HashMap<&'static str, CachedTexture>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    /// Maximum number of textures to keep
    max_cache_size: usize,
    uploads: u64,
}

impl TextureCache {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            textures: HashMap::new(),
            current_frame: 0,
            max_cache_size,
            uploads: 0,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Returns the texture for `key`, uploading a fresh image if `version` changed
    pub fn get_or_update<F>(
        &mut self,
        ctx: &Context,
        key: &'static str,
        version: u64,
        generator: F,
    ) -> Result<TextureId, TextureError>
    where
        F: FnOnce() -> ColorImage,
    {
        let current_frame = self.current_frame;

        if let Some(cached) = self.textures.get_mut(key) {
            cached.last_used = current_frame;
            if cached.version != version {
                cached.handle.set(checked(key, generator())?, TEXTURE_OPTIONS);
                cached.version = version;
                self.uploads += 1;
            }
            return Ok(cached.handle.id());
        }

        let image = checked(key, generator())?;
        let handle = ctx.load_texture(key, image, TEXTURE_OPTIONS);
        let id = handle.id();
        self.uploads += 1;
        self.textures.insert(key, CachedTexture {
            handle,
            version,
            last_used: current_frame,
        });
        self.prune_cache_if_needed();

        Ok(id)
    }

    /// Drops the texture for `key`
    pub fn invalidate(&mut self, key: &str) {
        self.textures.remove(key);
    }

    /// Evicts the least recently used textures above the size limit
    fn prune_cache_if_needed(&mut self) {
        while self.textures.len() > self.max_cache_size {
            let oldest = self
                .textures
                .iter()
                .min_by_key(|(_, cached)| cached.last_used)
                .map(|(key, _)| *key);
            match oldest {
                Some(key) => {
                    self.textures.remove(key);
                }
                None => break,
            }
        }
    }

    pub fn cache_size(&self) -> usize {
        self.textures.len()
    }

    /// Total number of image uploads performed
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXTURES)
    }
}

impl std::fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureCache")
            .field("keys", &self.textures.keys().collect::<Vec<_>>())
            .field("current_frame", &self.current_frame)
            .field("uploads", &self.uploads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_image() -> ColorImage {
        ColorImage::new([10, 10], egui::Color32::WHITE)
    }

    #[test]
    fn test_same_version_is_not_reuploaded() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(10);

        let first = cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();
        let second = cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.uploads(), 1);
        assert_eq!(cache.cache_size(), 1);
    }

    #[test]
    fn test_new_version_updates_in_place() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(10);

        let first = cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();
        let second = cache.get_or_update(&ctx, "canvas", 2, mock_image).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.uploads(), 2);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(10);

        let result = cache.get_or_update(&ctx, "canvas", 1, || {
            ColorImage::new([0, 10], egui::Color32::WHITE)
        });

        assert_eq!(
            result,
            Err(TextureError::EmptyImage { key: "canvas", width: 0, height: 10 })
        );
        assert_eq!(cache.cache_size(), 0);
        assert_eq!(cache.uploads(), 0);
    }

    #[test]
    fn test_empty_update_keeps_the_old_texture() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(10);
        cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();

        let result = cache.get_or_update(&ctx, "canvas", 2, || {
            ColorImage::new([10, 0], egui::Color32::WHITE)
        });

        assert!(result.is_err());
        assert!(cache.contains("canvas"));
        assert_eq!(cache.uploads(), 1);
    }

    #[test]
    fn test_textures_are_filtered_linearly() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(10);

        let id = cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();

        let options = ctx.tex_manager().read().meta(id).map(|meta| meta.options);
        assert_eq!(options, Some(TextureOptions::LINEAR));
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(2);

        cache.get_or_update(&ctx, "dial", 1, mock_image).unwrap();
        cache.begin_frame();
        cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();
        cache.begin_frame();
        cache.get_or_update(&ctx, "clipping", 1, mock_image).unwrap();

        assert_eq!(cache.cache_size(), 2);
        assert!(!cache.contains("dial"));
        assert!(cache.contains("canvas"));
        assert!(cache.contains("clipping"));
    }

    #[test]
    fn test_invalidate() {
        let ctx = Context::default();
        let mut cache = TextureCache::new(10);
        cache.get_or_update(&ctx, "canvas", 1, mock_image).unwrap();

        cache.invalidate("canvas");

        assert_eq!(cache.cache_size(), 0);
    }
}
