//! Tabular artifact rendering. The native spreadsheet byte format is an
//! out-of-scope external collaborator; `CsvRenderer` is the one concrete
//! `ArtifactRenderer` this crate ships, emitting UTF-8 text that a
//! binary-spreadsheet renderer can later replace behind the same trait.

use hydrofind_shared::HydroError;

use crate::rows::{ArtifactRow, COLUMNS};

pub trait ArtifactRenderer {
    fn render(&self, rows: &[ArtifactRow]) -> Result<Vec<u8>, HydroError>;
}

pub struct CsvRenderer;

impl ArtifactRenderer for CsvRenderer {
    fn render(&self, rows: &[ArtifactRow]) -> Result<Vec<u8>, HydroError> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

        writer
            .write_record(COLUMNS.iter().map(|(header, _)| *header))
            .map_err(|e| HydroError::Internal(format!("artifact header write failed: {e}")))?;

        for row in rows {
            writer
                .write_record([&row.query, &row.name, &row.article, &row.quantity])
                .map_err(|e| HydroError::Internal(format!("artifact row write failed: {e}")))?;
        }

        writer
            .into_inner()
            .map_err(|e| HydroError::Internal(format!("artifact flush failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_then_rows_as_csv() {
        let rows = vec![
            ArtifactRow { query: "dkol 12".into(), name: "Fitting A".into(), article: "A1".into(), quantity: "3".into() },
            ArtifactRow { query: "dkol 12".into(), name: "not found".into(), article: String::new(), quantity: String::new() },
        ];
        let bytes = CsvRenderer.render(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Query,Name,Article,Quantity"));
        assert_eq!(lines.next(), Some("dkol 12,Fitting A,A1,3"));
        assert_eq!(lines.next(), Some("dkol 12,not found,,"));
    }

    #[test]
    fn renders_header_only_for_empty_rows() {
        let bytes = CsvRenderer.render(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Query,Name,Article,Quantity\n");
    }
}
