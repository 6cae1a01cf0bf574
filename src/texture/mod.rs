pub mod cache;
pub mod frames;
#[cfg(feature = "window")]
pub mod text;
#[cfg(feature = "window")]
pub mod upload;
