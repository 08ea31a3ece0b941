//! Statement table types: named columns, rows, and the output table.

/// Columns of the statement's transaction table, in page order.
///
/// A row's cells are addressed by position: the n-th fragment on a line belongs
/// to the n-th column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Posting date.
    Date,
    /// Operation code.
    OperationCode,
    /// Free-text description; the only cell that wraps onto extra lines.
    Description,
    /// Amount in the account currency.
    Amount,
}

impl Column {
    /// All columns in table order.
    pub const ALL: [Column; 4] = [
        Column::Date,
        Column::OperationCode,
        Column::Description,
        Column::Amount,
    ];

    /// Position of this column's cell within a row.
    pub fn index(self) -> usize {
        match self {
            Column::Date => 0,
            Column::OperationCode => 1,
            Column::Description => 2,
            Column::Amount => 3,
        }
    }

    /// Header text as printed on the statement.
    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Дата проводки",
            Column::OperationCode => "Код операции",
            Column::Description => "Описание",
            Column::Amount => "Сумма в валюте счета",
        }
    }
}

/// One output row: cell strings in fragment order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// The header row built from [`Column::ALL`].
    pub fn header() -> Self {
        Self::new(Column::ALL.iter().map(|c| c.header().to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return a copy of this row with the currency suffix removed from the last cell.
    pub fn cleaned(&self, currency_suffix: &str) -> Row {
        let mut cells = self.cells.clone();
        if let Some(last) = cells.last_mut() {
            let stripped = strip_currency_suffix(last, currency_suffix).len();
            last.truncate(stripped);
        }
        Row { cells }
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self { cells }
    }
}

impl<const N: usize> From<[&str; N]> for Row {
    fn from(cells: [&str; N]) -> Self {
        Self {
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Strip every trailing occurrence of `suffix` from `cell`.
///
/// Only the exact suffix is removed; interior occurrences and other currency
/// codes are left alone. Stripping repeats until the cell no longer ends with
/// the suffix, so applying it twice gives the same result as once.
pub fn strip_currency_suffix<'a>(cell: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return cell;
    }
    let mut rest = cell;
    while let Some(stripped) = rest.strip_suffix(suffix) {
        rest = stripped;
    }
    rest
}

/// The finished statement table: header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub header: Row,
    pub rows: Vec<Row>,
}

impl OutputTable {
    /// Build a table with the standard statement header.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            header: Row::header(),
            rows,
        }
    }

    /// Header followed by data rows, in output order.
    pub fn iter_all(&self) -> impl Iterator<Item = &Row> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }

    /// Total number of rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }
}
