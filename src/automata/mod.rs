//! The compiled form of a pattern and the pieces that build it.

pub(crate) mod cleanup;
pub(crate) mod compiler;
pub mod program;
