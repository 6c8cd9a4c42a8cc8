// ---------------------------------------------------------------------------
// CellValue – a single cell of an exported table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, inferred from the CSV text of an engine export.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// Infer the cell type from raw CSV text.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric view of the cell; `None` for text and missing values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// One named column of a [`TabularDataset`].
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    /// The numeric cells in row order, skipping text and missing values.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }
}

// ---------------------------------------------------------------------------
// TabularDataset – one loaded CSV export
// ---------------------------------------------------------------------------

/// An exported drillhole table: ordered named columns of equal length.
#[derive(Debug, Clone)]
pub struct TabularDataset {
    columns: Vec<Column>,
    rows: usize,
}

impl TabularDataset {
    /// Build the column-major table from a header and row-major records.
    /// Short records are padded with nulls.
    pub fn from_rows(headers: Vec<String>, records: Vec<Vec<CellValue>>) -> Self {
        let rows = records.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows),
            })
            .collect();

        for record in records {
            let mut cells = record.into_iter();
            for column in &mut columns {
                column.values.push(cells.next().unwrap_or(CellValue::Null));
            }
        }

        TabularDataset { columns, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_infers_cell_types() {
        assert_eq!(CellValue::parse("12"), CellValue::Integer(12));
        assert_eq!(CellValue::parse(" 1.5 "), CellValue::Float(1.5));
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("DH001"), CellValue::Text("DH001".into()));
    }

    #[test]
    fn numeric_values_skip_text_and_nulls() {
        let column = Column {
            name: "AU".into(),
            values: vec![
                CellValue::Float(0.5),
                CellValue::Null,
                CellValue::Text("-".into()),
                CellValue::Integer(2),
            ],
        };
        assert_eq!(column.values.len(), 4);
        assert_eq!(column.numeric_values(), vec![0.5, 2.0]);
    }

    #[test]
    fn from_rows_pads_short_records() {
        let ds = TabularDataset::from_rows(
            vec!["BHID".into(), "LENGTH".into()],
            vec![
                vec![CellValue::Text("A".into()), CellValue::Float(1.0)],
                vec![CellValue::Text("B".into())],
            ],
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), vec!["BHID", "LENGTH"]);
        let length = ds.column("LENGTH").unwrap();
        assert_eq!(length.values[1], CellValue::Null);
        assert!(ds.column("ZONE").is_none());
    }
}
