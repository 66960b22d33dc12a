//! Header and row normalisation for tabular output.

/// Headers plus display rows, with optional untruncated rows for JSON export.
///
/// Every row is normalised to the header width on construction: short rows are
/// padded with empty cells and surplus cells are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSpec {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    full_rows: Option<Vec<Vec<String>>>,
}

impl TableSpec {
    /// Build a table from headers and display rows.
    #[must_use]
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let rows = normalise_rows(headers.len(), rows);
        Self {
            headers,
            rows,
            full_rows: None,
        }
    }

    /// Attach untruncated rows used only when exporting JSON.
    #[must_use]
    pub fn with_full_rows<R, C>(mut self, full_rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.full_rows = Some(normalise_rows(self.headers.len(), full_rows));
        self
    }

    /// Column headers in display order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows rendered in table mode.
    #[must_use]
    pub fn display_rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Rows rendered in JSON mode: the full rows when present, else the display rows.
    #[must_use]
    pub fn export_rows(&self) -> &[Vec<String>] {
        self.full_rows.as_deref().unwrap_or(&self.rows)
    }
}

fn normalise_rows<R, C>(width: usize, rows: R) -> Vec<Vec<String>>
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: Into<String>,
{
    rows.into_iter()
        .map(|row| {
            let mut cells: Vec<String> = row.into_iter().take(width).map(Into::into).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded_not_dropped() {
        let spec = TableSpec::new(["ID", "NAME", "STATUS"], [vec!["a"], vec!["b", "two"]]);
        assert_eq!(
            spec.display_rows(),
            [
                vec!["a".to_string(), String::new(), String::new()],
                vec!["b".to_string(), "two".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn long_rows_are_cut_to_header_width() {
        let spec = TableSpec::new(["ID"], [vec!["a", "extra"]]);
        assert_eq!(spec.display_rows(), [vec!["a".to_string()]]);
    }

    #[test]
    fn export_rows_prefer_full_rows() {
        let spec = TableSpec::new(["NAME"], [vec!["short..."]]).with_full_rows([vec!["short name"]]);
        assert_eq!(spec.display_rows(), [vec!["short...".to_string()]]);
        assert_eq!(spec.export_rows(), [vec!["short name".to_string()]]);
    }

    #[test]
    fn export_rows_fall_back_to_display_rows() {
        let spec = TableSpec::new(["NAME"], [vec!["value"]]);
        assert_eq!(spec.export_rows(), spec.display_rows());
    }
}
