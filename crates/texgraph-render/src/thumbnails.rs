//! Decoded node thumbnails keyed by [`ThumbnailId`].

use crate::renderer::{RenderResult, RendererError};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};
use std::collections::HashMap;
use std::sync::Arc;
use texgraph_core::surface::ThumbnailId;

/// Owner of thumbnail pixel data.
///
/// Nodes only hold the id; backends resolve it here when blitting.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailStore {
    images: HashMap<ThumbnailId, ImageData>,
    next_id: u64,
}

impl ThumbnailStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw RGBA8 pixels. `rgba` must hold exactly `width * height * 4` bytes.
    pub fn insert_rgba(&mut self, width: u32, height: u32, rgba: Vec<u8>) -> RenderResult<ThumbnailId> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(RendererError::InvalidThumbnail {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        let id = ThumbnailId(self.next_id);
        self.next_id += 1;
        self.images.insert(
            id,
            ImageData {
                data: Blob::new(Arc::new(rgba)),
                format: ImageFormat::Rgba8,
                width,
                height,
                alpha_type: ImageAlphaType::Alpha,
            },
        );
        log::debug!("stored thumbnail {id:?} ({width}x{height})");
        Ok(id)
    }

    /// Decode a PNG, JPEG or WebP image and add it.
    pub fn insert_encoded(&mut self, bytes: &[u8]) -> RenderResult<ThumbnailId> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        self.insert_rgba(width, height, rgba.into_vec())
    }

    pub fn get(&self, id: ThumbnailId) -> Option<&ImageData> {
        self.images.get(&id)
    }

    /// Pixel dimensions of a stored thumbnail.
    pub fn dimensions(&self, id: ThumbnailId) -> Option<(u32, u32)> {
        self.images.get(&id).map(|image| (image.width, image.height))
    }

    pub fn remove(&mut self, id: ThumbnailId) -> bool {
        self.images.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat as EncodedFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_insert_rgba() {
        let mut store = ThumbnailStore::new();
        let a = store.insert_rgba(2, 2, vec![255; 16]).unwrap();
        let b = store.insert_rgba(1, 1, vec![0; 4]).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimensions(a), Some((2, 2)));
        assert_eq!(store.get(b).unwrap().data.data().len(), 4);
    }

    #[test]
    fn test_insert_rgba_rejects_wrong_length() {
        let mut store = ThumbnailStore::new();
        let err = store.insert_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            RendererError::InvalidThumbnail { expected: 16, actual: 15, .. }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_encoded_png() {
        let mut pixels = RgbaImage::new(3, 2);
        pixels.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        pixels.write_to(&mut Cursor::new(&mut bytes), EncodedFormat::Png).unwrap();

        let mut store = ThumbnailStore::new();
        let id = store.insert_encoded(&bytes).unwrap();
        assert_eq!(store.dimensions(id), Some((3, 2)));
        assert_eq!(&store.get(id).unwrap().data.data()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_insert_encoded_garbage() {
        let mut store = ThumbnailStore::new();
        let err = store.insert_encoded(b"not an image").unwrap_err();
        assert!(matches!(err, RendererError::Decode(_)));
    }

    #[test]
    fn test_remove() {
        let mut store = ThumbnailStore::new();
        let id = store.insert_rgba(1, 1, vec![0; 4]).unwrap();
        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.get(id).is_none());
    }
}
