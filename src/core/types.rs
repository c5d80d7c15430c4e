/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type (monotonic, never reused)
pub type Pid = u64;

/// Advisory priority weight (stored, never reorders the ready queue)
pub type Priority = i32;

/// Name of an execution context slot
pub type SlotName = String;

/// Opaque value stored in an execution context slot
pub type SlotValue = serde_json::Value;
