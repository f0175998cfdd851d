//! Client core for the SciHealth conference portal.
//!
//! The remote API answers in shapes that drift between endpoints and
//! deployments, so everything it returns passes through [`normalize`] before
//! the rest of the crate sees it.

pub mod api;
pub mod config;
pub mod error;
pub mod fanout;
pub mod identity;
pub mod normalize;
pub mod portal;
pub mod proposal;
pub mod stats;

pub use error::{ClientError, ClientResult};
