//! Real-world scenario benchmarks.
//!
//! Voice managers at full polyphony and complete engines with the filter
//! and an effect chain in the path.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
