//! Single-slot controller for the report generation job.
//!
//! - `state`: `ReportController`, the owner of the job slot. It serializes
//!   every read and write of the slot behind one mutex and supervises the
//!   running job so the slot always reaches a terminal state.
//! - `report`: the job body itself, a cancellable simulated workload that
//!   writes the report file.

pub mod report;
pub mod state;

pub use state::ReportController;
