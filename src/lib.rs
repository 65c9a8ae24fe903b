//! Ruleflow — in-process scheduling core for rule-instance tasks.
//!
//! Jobs describe the executable nodes of rule instances; workers host them
//! as tasks. The scheduler assigns each job to a capability-matching worker,
//! runs one creation pass per `(instance, node)` pair, reloads on
//! reschedule, and tears instances down on shutdown.

pub mod error;
pub mod job;
pub mod scheduler;
pub mod task;
pub mod worker;
