//! In-memory table model. One loaded worksheet is held as an ordered set of
//! named columns; rows are addressed by index and the original sheet order is
//! preserved (row-range filtering relies on it).

/// Marker shown (and baked into filter output) for null/empty cells.
pub const NULL_MARKER: &str = "NULL";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// A cell counts as null when it is absent or an exact empty string.
    /// No trimming, matching the loader's defaulting behavior.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Rendering for the table view: null cells show the NULL marker.
    pub fn display_string(&self) -> String {
        if self.is_null() {
            NULL_MARKER.to_string()
        } else {
            self.raw_string()
        }
    }

    /// Rendering for file export: null cells become empty fields.
    pub fn export_string(&self) -> String {
        if self.is_null() {
            String::new()
        } else {
            self.raw_string()
        }
    }

    fn raw_string(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

// Integral values print without a trailing ".0" so a spreadsheet "2" does not
// come back as "2.0" in the table or a CSV export.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, data: Vec<Cell>) -> Self {
        Column {
            name: name.into(),
            data,
        }
    }

    /// Widest rendered value in this column, including the header name.
    pub fn display_width(&self) -> usize {
        self.data
            .iter()
            .map(|c| c.display_string().chars().count())
            .max()
            .unwrap_or(0)
            .max(self.name.chars().count())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Sheet {
            name: name.into(),
            columns,
        }
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.columns.get(col).and_then(|c| c.data.get(row))
    }
}
