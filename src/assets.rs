//! Asset handles and the loading boundary
//!
//! Backends own the actual textures, fonts and sounds; games only ever hold
//! the small typed ids handed out here. Each id is acquired once at startup
//! and released once at shutdown.

use thiserror::Error;

/// Texture handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Font handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// One-shot sound handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Streamed music handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MusicId(pub u32);

/// Kind of asset a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Font,
    Sound,
    Music,
}

/// Any loaded asset, for release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetHandle {
    Texture(TextureId),
    Font(FontId),
    Sound(SoundId),
    Music(MusicId),
}

/// An asset a game wants loaded
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub kind: AssetKind,
    pub path: String,
}

impl AssetRequest {
    pub fn new(kind: AssetKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Asset loading failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },

    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("{kind:?} not supported by this backend: {path}")]
    Unsupported { path: String, kind: AssetKind },

    #[error("asset was not preloaded: {path}")]
    NotPreloaded { path: String },
}

/// Backend side of asset loading
pub trait AssetLoader {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError>;
    fn load_font(&mut self, path: &str) -> Result<FontId, AssetError>;
    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError>;
    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError>;
    fn release(&mut self, handle: AssetHandle);
}

/// Load an asset that the game can live without
///
/// Failures are logged and turned into `None`; the caller draws a fallback.
pub fn optional<T>(result: Result<T, AssetError>) -> Option<T> {
    match result {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("{e}");
            None
        }
    }
}

/// Release a handle if it was ever loaded
pub fn release_opt<T: Into<AssetHandle>>(loader: &mut dyn AssetLoader, handle: Option<T>) {
    if let Some(handle) = handle {
        loader.release(handle.into());
    }
}

impl From<TextureId> for AssetHandle {
    fn from(id: TextureId) -> Self {
        AssetHandle::Texture(id)
    }
}

impl From<FontId> for AssetHandle {
    fn from(id: FontId) -> Self {
        AssetHandle::Font(id)
    }
}

impl From<SoundId> for AssetHandle {
    fn from(id: SoundId) -> Self {
        AssetHandle::Sound(id)
    }
}

impl From<MusicId> for AssetHandle {
    fn from(id: MusicId) -> Self {
        AssetHandle::Music(id)
    }
}
