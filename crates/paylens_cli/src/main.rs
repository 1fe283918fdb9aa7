//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `paylens_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use paylens_core::db::migrations::latest_version;

fn main() {
    println!("paylens_core version={}", paylens_core::core_version());
    println!("paylens_core schema_version={}", latest_version());
}
