//! ArtifactBuilder: renders a completed `TaskResult` into the tabular
//! artifact the Download endpoint streams.

pub mod builder;
pub mod renderer;
pub mod rows;

pub use builder::ArtifactBuilder;
pub use renderer::{ArtifactRenderer, CsvRenderer};
pub use rows::{ArtifactRow, COLUMNS};
