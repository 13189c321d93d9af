//! Diffusion-Limited Aggregation growth engine.
//!
//! The engine grows a single cluster from a seed inside a fixed circular
//! boundary and paints every committed particle onto a host-provided
//! [`Surface`]. Animation is cooperative: the host delivers frames through a
//! [`FrameScheduler`] and each frame runs one small batch of particles.

pub mod color;
pub mod config;
pub mod scheduler;
pub mod settings;
pub mod simulation;
pub mod surface;

pub use color::{Band, Palette, Rgb};
pub use config::{AppConfig, ConfigError};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use settings::{EngineSettings, Sizing};
pub use simulation::{Boundary, Cell, DlaEngine};
pub use surface::{PixelBuffer, Surface};
