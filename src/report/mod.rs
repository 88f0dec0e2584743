//! Report assembly, rendering and export.

mod assembler;
mod export;
mod generator;

pub use export::{export, ExportRequest, ExportTarget};
pub use generator::RenderOptions;
