pub mod passes;
pub mod renderer;
pub mod setup;
pub mod shaders;
