//! Infrastructure adapters: frame-source backends.

pub mod frame_source;

#[cfg(not(target_arch = "wasm32"))]
pub use frame_source::IntervalFrameSource;
pub use frame_source::ManualFrameSource;
