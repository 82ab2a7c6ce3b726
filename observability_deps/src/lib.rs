//! Re-exports the workspace's observability stack so that all crates log
//! through one pinned version.

#![deny(rust_2018_idioms)]

pub use tracing;
