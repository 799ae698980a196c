//! Rendering adapters: Plotly figure JSON for the browser and static PNG rasters.

pub mod palette;
pub mod plotly;
mod raster;

pub use raster::RasterRenderer;
