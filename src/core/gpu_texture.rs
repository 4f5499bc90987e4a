use std::thread::{self, ThreadId};

use serde::{Deserialize, Serialize};

use super::gpu_context::GpuContext;
use super::pixel_store::{DirtyState, PixelStore};
use super::texture_units::{TextureUnit, TextureUnits};
use super::wgpu_texture::WgpuTexture;
use crate::error::{RendererError, Result};
use crate::traits::{ImageBuffer, TextureBackend};

/// When `update_and_bind` transfers the buffer to the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UploadPolicy {
    /// Re-upload the full image on every call
    #[default]
    Always,
    /// Upload only while the store is dirty
    OnChange,
}

/// What `update_and_bind` did with the pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    /// Store was clean under `UploadPolicy::OnChange`; the texture already matched
    Skipped,
}

/// A pixel store paired with the GPU texture it is displayed through
///
/// Producers write through the [`ImageBuffer`] methods from any thread. The
/// render loop calls [`GpuTexture::update_and_bind`] once per frame; that call
/// must be made on the thread that constructed the texture, which is taken to
/// own the graphics context.
pub struct GpuTexture<B: TextureBackend = WgpuTexture> {
    store: PixelStore,
    backend: B,
    policy: UploadPolicy,
    owner: ThreadId,
}

impl GpuTexture<WgpuTexture> {
    /// Allocate a linearly filtered wgpu texture and a pixel store of the same size
    ///
    /// The texture comes first so sizes past the device limit are rejected
    /// before any host memory is committed.
    pub fn new(gpu: &GpuContext, width: u32, height: u32, policy: UploadPolicy) -> Result<Self> {
        let backend = WgpuTexture::new(gpu, width, height)?;
        let store = PixelStore::new(width, height)?;
        Self::from_parts(store, backend, policy)
    }
}

impl<B: TextureBackend> GpuTexture<B> {
    /// Pair an existing store with a backend of matching dimensions
    ///
    /// The calling thread becomes the owner for upload/bind purposes.
    pub fn from_parts(store: PixelStore, backend: B, policy: UploadPolicy) -> Result<Self> {
        let (width, height) = backend.dimensions();
        if store.dimensions() != (width, height) {
            return Err(RendererError::InvalidDimensions { width, height });
        }

        Ok(Self {
            store,
            backend,
            policy,
            owner: thread::current().id(),
        })
    }

    /// Upload the current image if needed and bind the texture to `unit`
    ///
    /// The whole transfer happens while the store's lock is held, so the GPU
    /// never receives a half-written image. The store is `Clean` afterwards.
    pub fn update_and_bind(
        &self,
        unit: TextureUnit,
        units: &mut TextureUnits<B::Binding>,
    ) -> Result<UploadOutcome> {
        let current = thread::current().id();
        if current != self.owner {
            return Err(RendererError::ContextAffinity {
                owner: self.owner,
                actual: current,
            });
        }

        let (width, height) = self.store.dimensions();
        let outcome = self.store.consume(|pixels, dirty| {
            let skip = self.policy == UploadPolicy::OnChange && dirty == DirtyState::Clean;
            if skip {
                UploadOutcome::Skipped
            } else {
                self.backend.upload(pixels, width, height);
                UploadOutcome::Uploaded
            }
        });

        units.bind(unit, self.backend.binding().clone());
        Ok(outcome)
    }

    pub fn store(&self) -> &PixelStore {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    /// Thread allowed to call `update_and_bind`
    pub fn owner(&self) -> ThreadId {
        self.owner
    }
}

impl<B: TextureBackend> ImageBuffer for GpuTexture<B> {
    fn dimensions(&self) -> (u32, u32) {
        self.store.dimensions()
    }

    fn byte_count(&self) -> usize {
        self.store.byte_count()
    }

    fn write_rgba_image(&self, source: &[u8]) -> Result<()> {
        self.store.write_rgba_image(source)
    }

    fn write_grayscale_image(&self, source: &[u8]) -> Result<()> {
        self.store.write_grayscale_image(source)
    }

    fn read_image(&self, dest: &mut [u8]) -> Result<()> {
        self.store.read_image(dest)
    }

    fn dirty_state(&self) -> DirtyState {
        self.store.dirty_state()
    }
}
