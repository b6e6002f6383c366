//! Outbound adapters implementing domain ports.
//!
//! The in-memory account directory backs the use-case ports; a
//! database-backed adapter would sit alongside it and implement the same
//! ports. Reset tokens leave through the [`notify`] adapters.

pub mod memory;
pub mod notify;

pub use memory::InMemoryAccounts;
pub use notify::{LoggingResetNotifier, ResetOutbox};
