pub mod company;

pub use company::{
    normalize_symbol, Company, CompanyPatch, NewCompany, DESCRIPTION_MAX_LEN, NAME_MAX_LEN,
    SYMBOL_MAX_LEN,
};
