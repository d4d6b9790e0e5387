//! hallway
//!
//! A small real-time rendering sandbox: a textured hallway explored with a
//! fly camera, lit by two point lights with normal and parallax mapping,
//! rendered into an HDR target and finished with a bright-pass/blur bloom
//! and a tone-mapping composite. The crate exposes the building blocks so a
//! binary can assemble its own scene and run the frame loop.
//!
//! High-level modules
//! - `app`: winit event loop, input routing and the per-frame driver
//! - `camera`: fly camera, projection and input accumulation
//! - `context`: central GPU and window context owning device/queue/surface
//! - `pipelines`: scene and post-process pipelines with embedded WGSL
//! - `renderer`: per-frame orchestration of scene, bloom and composite
//! - `resources`: texture and OBJ model loading from `assets/`
//! - `scene`: quads, hallway layout, lights, materials and models
//! - `settings`: live-tunable parameters with clamped ranges
//! - `target`: offscreen HDR render targets
//! - `texture`: GPU texture wrapper and creation helpers
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod pipelines;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod target;
pub mod texture;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
