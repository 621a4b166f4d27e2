//! Architecture-level signal definitions.
//!
//! The CSR file and the interrupt controller are collaborators outside this
//! crate; only the request they present to the pipeline is modelled here.

/// Interrupt request record and cause codes.
pub mod trap;
