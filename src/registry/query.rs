//! Query engine - filter, sort, and paginate the company collection
//!
//! Parameter parsing is deliberately forgiving: unrecognized search
//! fields mean "no filter", unrecognized sort fields fall back to name,
//! unrecognized directions fall back to ascending. Existing clients
//! depend on these silent fallbacks, so none of them raise an error.

use crate::models::Company;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Hard ceiling on caller-supplied page sizes
pub const MAX_PAGE_SIZE: usize = 45;

/// Which field(s) a search term applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Substring match over name, symbol, and description
    InAll,
    InName,
    InSymbol,
    InDescription,
    /// Exact match against the stored (uppercase) symbol
    BySymbol,
    /// No filter
    None,
}

impl SearchField {
    /// Parse the `search_field` query parameter; unknown values mean no filter.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("in_all") => SearchField::InAll,
            Some("in_name") => SearchField::InName,
            Some("in_symbol") => SearchField::InSymbol,
            Some("in_description") => SearchField::InDescription,
            Some("by_symbol") => SearchField::BySymbol,
            _ => SearchField::None,
        }
    }
}

/// Sortable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Symbol,
}

impl SortField {
    /// Parse the `sort_by` query parameter; anything unrecognized falls back to name.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("symbol") => SortField::Symbol,
            _ => SortField::Name,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse the `sort_direction` query parameter; anything unrecognized falls back to asc.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// One fully-parsed list query, built fresh per request
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub search_field: SearchField,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
    pub per_page: usize,
    pub page: usize,
}

impl QuerySpec {
    /// Build a spec from raw query parameters, applying the silent
    /// fallbacks, the page-size clamp, and 1-indexing.
    pub fn from_params(
        search_field: Option<&str>,
        search: Option<String>,
        sort_by: Option<&str>,
        sort_direction: Option<&str>,
        per_page: Option<usize>,
        page: Option<usize>,
    ) -> Self {
        Self {
            search_field: SearchField::parse(search_field),
            search,
            sort_by: SortField::parse(sort_by),
            sort_direction: SortDirection::parse(sort_direction),
            per_page: per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            page: page.unwrap_or(1).max(1),
        }
    }
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self::from_params(None, None, None, None, None, None)
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone)]
pub struct Page {
    /// Total number of records matching the filter, across all pages
    pub count: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub results: Vec<Company>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(company: &Company, field: SearchField, term: &str) -> bool {
    let description = company.description.as_deref().unwrap_or("");
    match field {
        SearchField::InAll => {
            contains_ci(&company.name, term)
                || contains_ci(&company.symbol, term)
                || contains_ci(description, term)
        }
        SearchField::InName => contains_ci(&company.name, term),
        SearchField::InSymbol => contains_ci(&company.symbol, term),
        SearchField::InDescription => contains_ci(description, term),
        // Stored symbols are uppercase, so uppercasing the term makes the
        // exact comparison effectively case-insensitive on input.
        SearchField::BySymbol => company.symbol == term.to_uppercase(),
        SearchField::None => true,
    }
}

/// Filter, sort, and paginate the collection.
///
/// The sort is stable, so records that compare equal on the chosen field
/// keep their insertion order. Requesting a page past the end yields an
/// empty page with an accurate total count.
pub fn search(companies: Vec<Company>, spec: &QuerySpec) -> Page {
    let mut matched: Vec<Company> = match (&spec.search, spec.search_field) {
        (Some(term), field) if field != SearchField::None && !term.is_empty() => companies
            .into_iter()
            .filter(|c| matches(c, field, term))
            .collect(),
        _ => companies,
    };

    matched.sort_by(|a, b| {
        let ordering = match spec.sort_by {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Symbol => a.symbol.cmp(&b.symbol),
        };
        match spec.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let count = matched.len();
    let total_pages = (count + spec.per_page - 1) / spec.per_page;
    let start = (spec.page - 1).saturating_mul(spec.per_page);
    let results: Vec<Company> = matched
        .into_iter()
        .skip(start)
        .take(spec.per_page)
        .collect();

    Page {
        count,
        page: spec.page,
        per_page: spec.per_page,
        total_pages,
        results,
    }
}
