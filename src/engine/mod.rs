//! Carousel Engine - Host boundary and deferred work.
//!
//! - Host: the trait every collaborator role is expressed through
//! - MemoryHost: arena element tree implementing Host
//! - TimerQueue: virtual-clock intervals and timeouts
//!
//! # Architecture
//!
//! The controller owns a host and a timer queue. The embedding event loop
//! feeds it input events and elapsed time; the host queues size and
//! structure notifications that the controller drains on each turn:
//!
//! ```text
//! input ──► controller.handle()  ─┐
//! time  ──► controller.advance() ─┼─► IndexState ─► Host (transform, flags)
//! host.poll_events() ─────────────┘
//! ```

mod host;
mod memory;
mod timers;

pub use host::*;
pub use memory::MemoryHost;
pub use timers::{TimerId, TimerQueue};
