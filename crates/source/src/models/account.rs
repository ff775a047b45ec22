use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifiers of the single account being polled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIds {
    /// Consumer number (户号).
    pub cons_no: String,
    /// Supplying organization number.
    pub org_no: String,
    /// Optional secondary token sent with fee queries.
    #[serde(default)]
    pub open_id: Option<String>,
}

impl AccountIds {
    pub fn new(cons_no: impl Into<String>, org_no: impl Into<String>) -> Self {
        Self {
            cons_no: cons_no.into(),
            org_no: org_no.into(),
            open_id: None,
        }
    }

    pub fn with_open_id(mut self, open_id: impl Into<String>) -> Self {
        let open_id = open_id.into();
        self.open_id = if open_id.trim().is_empty() {
            None
        } else {
            Some(open_id)
        };
        self
    }
}

/// A calendar month, rendered as `YYYYMM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The month before this one, wrapping January to December of the
    /// previous year.
    pub fn previous(&self) -> Self {
        if self.month > 1 {
            Self::new(self.year, self.month - 1)
        } else {
            Self::new(self.year - 1, 12)
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}
