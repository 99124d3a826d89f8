//! CPU render surface, draw-command rasterizer, and post-process filters.

pub mod filter;
pub mod raster;
pub mod surface;

pub use filter::apply_filter;
pub use raster::execute;
pub use surface::Surface;
