//! CPU stage functions of both variants, one module per WGSL file.

pub mod lit;
pub mod unlit;
