//! Column routing

use std::fmt;

/// Where a column's value goes during column dispatch
///
/// Precedence when a column is registered more than once:
/// `Ignored` > `Handled` > `Captured` > `Mapped`. Columns registered
/// nowhere are `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Dropped without being looked at
    Ignored,
    /// Passed to a named column handler
    Handled,
    /// Stored raw into the row status variables
    Captured,
    /// Assigned to a field of the target entity
    Mapped,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::Ignored => "ignored",
            Route::Handled => "handled",
            Route::Captured => "captured",
            Route::Mapped => "mapped",
        };
        write!(f, "{}", name)
    }
}
