//! Core business logic - framework-agnostic ledger operations.
//!
//! The finalization workflow runs through these modules in order: the
//! authorization gate approves the actor, the week ledger yields the active
//! week, the statistics aggregator sums its child records, the tax resolver
//! prices the total, and the orchestrator commits the close-and-roll-forward
//! as one transaction.

/// Authorization gate - the single place role checks happen
pub mod auth;
/// Cleaning service intake
pub mod cleaning;
/// Finalization orchestrator - the atomic week transition
pub mod finalize;
/// Weekly report generation
pub mod report;
/// Sales intake
pub mod sale;
/// Deferred finalization requests and the poll-and-execute sweep
pub mod scheduled;
/// Week statistics aggregation with typed degraded sources
pub mod stats;
/// Tax bracket resolution and schedule seeding
pub mod tax;
/// Week ledger - the accounting week entity and its invariants
pub mod week;
