//! TexGraph Render Library
//!
//! Drawing surfaces and the scene renderer for TexGraph.
//! The Vello surface is available behind the `vello-renderer` feature.

pub mod recording;
mod renderer;
pub mod thumbnails;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{RenderContext, RenderResult, RendererError, SceneRenderer};
pub use thumbnails::ThumbnailStore;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
