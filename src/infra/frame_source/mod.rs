//! Frame-source backends.

#[cfg(not(target_arch = "wasm32"))]
pub mod interval;
pub mod manual;

#[cfg(not(target_arch = "wasm32"))]
pub use interval::IntervalFrameSource;
pub use manual::ManualFrameSource;
