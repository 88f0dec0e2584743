//! Working agent and session state.

mod aggregator;
mod document;

pub use aggregator::{Session, WorkingAgent};
