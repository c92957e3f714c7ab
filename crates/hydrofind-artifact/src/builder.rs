//! ArtifactBuilder: the Worker's terminal stage before PERSIST, and the
//! Download endpoint's on-demand materializer.

use hydrofind_shared::{HydroError, TaskResult};

use crate::renderer::{ArtifactRenderer, CsvRenderer};
use crate::rows::build_rows;

pub struct ArtifactBuilder<R: ArtifactRenderer = CsvRenderer> {
    renderer: R,
}

impl Default for ArtifactBuilder<CsvRenderer> {
    fn default() -> Self {
        Self { renderer: CsvRenderer }
    }
}

impl<R: ArtifactRenderer> ArtifactBuilder<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Materialize `result` into the rendered byte artifact.
    pub fn build(&self, result: &TaskResult) -> Result<Vec<u8>, HydroError> {
        let rows = build_rows(result);
        self.renderer.render(&rows)
    }
}
