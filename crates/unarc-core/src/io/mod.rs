//! I/O utilities for archive operations.
//!
//! This module provides reusable I/O wrappers shared by the tar and zip
//! extraction paths.

pub mod fault;

pub use fault::FaultFlag;
pub use fault::FaultTrackingReader;
