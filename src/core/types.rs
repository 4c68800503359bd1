/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type (signed to match the persisted record layout)
pub type Pid = i32;

/// Address type for simulated memory
pub type Address = u64;

/// Size type for simulated memory (capacity units, KB in the default table)
pub type Size = u64;
