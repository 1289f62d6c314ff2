//! Background task driving periodic polling and delivery.

pub mod poll_scheduler;

pub use poll_scheduler::PollScheduler;
pub use poll_scheduler::SweepSummary;
