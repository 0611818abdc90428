//! Processor core components.
//!
//! Only the backend bookkeeping that sits between decode and retirement lives here; fetch,
//! decode, execution units and the commit policy are external collaborators that talk to
//! it through the port bundles in [`pipeline::latches`].

/// Reorder buffer, hazard publication and port definitions.
pub mod pipeline;

pub use self::pipeline::rob::Rob;
