//! CLI command implementations for Feint.

pub(crate) mod play;
pub(crate) mod status;
pub(crate) mod submit;

mod input;
