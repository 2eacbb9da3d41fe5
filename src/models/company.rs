use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum stored length of a ticker symbol.
pub const SYMBOL_MAX_LEN: usize = 10;

/// Maximum length of a company name.
pub const NAME_MAX_LEN: usize = 50;

/// Maximum length of a company description.
pub const DESCRIPTION_MAX_LEN: usize = 100;

/// Company entity - a registered company keyed by its ticker symbol
///
/// The symbol is uppercased on every write and is unique across the
/// collection (case-insensitively, since it is always stored uppercase).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    /// Unique identifier, assigned at creation and immutable thereafter
    pub id: Uuid,

    /// Company name (max 50 characters)
    pub name: String,

    /// Free-form description (optional, max 100 characters)
    pub description: Option<String>,

    /// Ticker symbol (max 10 characters, stored uppercase)
    pub symbol: String,
}

/// Validated input for inserting a new company
///
/// Built by the record service after symbol resolution and field
/// validation; the store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub symbol: String,
}

/// Partial update to an existing company
///
/// Absent fields are left untouched. The symbol, if present, has already
/// been uppercased by the service.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub symbol: Option<String>,
}

/// Normalize a symbol the way the collection stores it.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol_uppercases() {
        assert_eq!(normalize_symbol("aapl"), "AAPL");
        assert_eq!(normalize_symbol("  msft "), "MSFT");
        assert_eq!(normalize_symbol("BRK.B"), "BRK.B");
    }
}
