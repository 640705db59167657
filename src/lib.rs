//! CPU reference implementation of a two-variant shading core.
//!
//! An unlit pipeline samples a texture; a lit pipeline adds ambient and
//! Lambertian diffuse from one point light over instanced geometry. The same
//! stages ship as WGSL in `res/shaders/`, checked against [`layout`] before a
//! pipeline is created.

pub mod core;
pub mod error;
pub mod io;
pub mod layout;
pub mod pipeline;
pub mod scene;

pub mod app;

pub use error::{Result, ShadingError};
