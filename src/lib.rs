#![recursion_limit = "256"]

pub mod bundle;
pub mod data;
pub mod export;
pub mod model;
pub mod mosaic;
pub mod params;
pub mod plotting;
pub mod projection;
pub mod sampling;
