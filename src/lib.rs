//! Digit slideshow: fetches model-generated digit images from a
//! generation backend (with a local fallback) and plays them back with
//! a crossfade animation.

pub mod constants;
pub mod fetch;
pub mod frame;
pub mod message;
pub mod playback;
pub mod texture;
