//! Generated background assets and frame compositing.
//!
//! Backgrounds arrive asynchronously from a generator service; the slot keeps
//! the currently installed asset and discards results from superseded
//! requests. The compositor places the asset behind the visualization with a
//! cover fit, a bass-driven pulse, and a dark scrim for contrast.

pub mod asset;
pub mod compositor;
pub mod generator;
pub mod slot;

pub use asset::BackgroundAsset;
pub use compositor::{cover_placement, draw_background};
pub use generator::{BackgroundGenerator, GenerateError};
pub use slot::{BackgroundSlot, GenerationToken};
