//! Asynchronous cube texture
//!
//! Decoding happens off the render thread and is delivered once over a
//! channel. The renderer polls that channel every frame; the first message
//! settles the texture as loaded or failed for good.

use crate::device::GraphicsDevice;
use crate::error::TextureError;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::{debug, info, warn};

/// Tightly packed RGBA8 pixels, first row at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wrap raw pixels, checking they describe a non-empty `width` x `height` image.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(TextureError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file in any format `image` understands.
    pub fn decode_file(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// Decode an encoded image held in memory.
    pub fn decode_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// Reject images with a side longer than `max_dimension`.
    pub fn check_fits(&self, max_dimension: u32) -> Result<(), TextureError> {
        if self.width > max_dimension || self.height > max_dimension {
            return Err(TextureError::TooLarge {
                width: self.width,
                height: self.height,
                max: max_dimension,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Where a texture is in its single unloaded → loaded/failed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed,
}

type DecodeResult = Result<DecodedImage, TextureError>;

/// Producer half of a pending texture. Consumed by its single delivery.
pub struct TextureSender {
    sender: Sender<DecodeResult>,
}

impl TextureSender {
    /// Deliver the decode result.
    pub fn complete(self, result: DecodeResult) {
        // The renderer may already be gone; nothing to deliver to then.
        let _ = self.sender.send(result);
    }
}

/// A texture whose pixels have been requested but not necessarily delivered.
pub struct TextureHandle {
    label: String,
    receiver: Receiver<DecodeResult>,
}

impl TextureHandle {
    /// A handle fed by the returned sender.
    pub fn pending(label: impl Into<String>) -> (TextureSender, Self) {
        let (sender, receiver) = mpsc::channel();
        let handle = Self {
            label: label.into(),
            receiver,
        };
        (TextureSender { sender }, handle)
    }

    /// Start decoding `path` on a worker thread and return immediately.
    pub fn begin_load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (sender, handle) = Self::pending(path.display().to_string());

        let spawned = std::thread::Builder::new()
            .name("texture-decode".into())
            .spawn(move || {
                let result = DecodedImage::decode_file(&path);
                sender.complete(result);
            });

        // A failed spawn drops the sender, so the handle settles as failed.
        if let Err(e) = spawned {
            warn!(texture = %handle.label, "could not start texture decode: {e}");
        }

        handle
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

enum Slot<T> {
    Unloaded(TextureHandle),
    Loaded(T),
    Failed,
}

/// The cube's texture: a committed handle until its pixels arrive, then a
/// GPU texture.
pub struct CubeTexture<T> {
    label: String,
    slot: Slot<T>,
}

impl<T> CubeTexture<T> {
    /// Take ownership of a pending handle.
    pub fn commit(handle: TextureHandle) -> Self {
        debug!(texture = %handle.label, "texture committed");
        Self {
            label: handle.label.clone(),
            slot: Slot::Unloaded(handle),
        }
    }

    /// Check for a delivered image without blocking and upload it if one arrived.
    pub fn poll<D: GraphicsDevice<Texture = T>>(
        &mut self,
        device: &mut D,
        program: &D::Program,
    ) -> LoadState {
        let Slot::Unloaded(handle) = &self.slot else {
            return self.state();
        };

        match handle.receiver.try_recv() {
            Err(TryRecvError::Empty) => LoadState::Unloaded,
            Ok(Ok(image)) => match device.create_texture(program, &image) {
                Ok(texture) => {
                    info!(
                        texture = %self.label,
                        width = image.width(),
                        height = image.height(),
                        "texture loaded"
                    );
                    self.slot = Slot::Loaded(texture);
                    LoadState::Loaded
                }
                Err(e) => self.fail(e),
            },
            Ok(Err(e)) => self.fail(e),
            Err(TryRecvError::Disconnected) => self.fail(TextureError::Disconnected),
        }
    }

    fn fail(&mut self, e: TextureError) -> LoadState {
        warn!(texture = %self.label, "texture failed to load: {e}");
        self.slot = Slot::Failed;
        LoadState::Failed
    }

    pub fn state(&self) -> LoadState {
        match self.slot {
            Slot::Unloaded(_) => LoadState::Unloaded,
            Slot::Loaded(_) => LoadState::Loaded,
            Slot::Failed => LoadState::Failed,
        }
    }

    /// The GPU texture, only once loaded.
    pub fn bound(&self) -> Option<&T> {
        match &self.slot {
            Slot::Loaded(texture) => Some(texture),
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
