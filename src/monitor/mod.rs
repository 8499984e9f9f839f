// Certificate refresh daemon
//
// Periodically re-fetches every tracked domain so stored snapshots stay
// current. Refreshes fan out under a bounded semaphore and the schedule is
// jittered so domains drift apart over time.

pub mod config;
pub mod daemon;
pub mod scheduler;

// Re-export commonly used types
pub use config::RefreshSettings;
pub use daemon::{DaemonStats, RefreshCycleSummary, RefreshDaemon};
pub use scheduler::RefreshScheduler;
