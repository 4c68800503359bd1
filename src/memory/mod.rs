/*!
 * Memory Module
 * Simulated heap: block chain, free index, PID index and the allocation engine
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::{FreeKey, Heap};
pub use traits::*;
pub use types::*;
