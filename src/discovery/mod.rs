//! Turns a deployed stack into described resource records.

use crate::cloud;

pub mod describe;
pub mod enumerate;

pub use describe::describe;
pub use enumerate::enumerate;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Failed to list the resources of stack {stack}: {source}")]
    Discovery { stack: String, source: cloud::Error },

    #[error("Failed to describe {logical_id}: {source}")]
    Describe {
        logical_id: String,
        source: cloud::Error,
    },

    #[error("Invalid introspection schema for {logical_id}: {reason}")]
    Schema { logical_id: String, reason: String },
}
