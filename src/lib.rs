//! PCB Preview Library
//!
//! This library turns an archive of Gerber and Excellon fabrication files
//! into rendered top/bottom board previews plus physical board
//! dimensions. The core is the layer-classification and composition
//! pipeline; per-file geometry parsing and rasterization sit behind the
//! [`render::backend::GeometryBackend`] trait.

// Module declarations
pub mod archive;
pub mod classify;
pub mod config;
pub mod constants;
pub mod dimensions;
pub mod error;
pub mod models;
pub mod outline;
pub mod package;
pub mod pipeline;
pub mod render;
pub mod stack;
pub mod theme;

#[cfg(feature = "web")]
pub mod web;
