// tests/support/mod.rs
// Shared by multiple integration test binaries; not every binary uses every
// helper, so silence per-crate dead_code noise here.
#[allow(dead_code, unused_imports)]
pub mod world;

#[allow(unused_imports)]
pub use world::*;
