//! Financial data and response generation

pub mod provider;
pub mod response;

pub use provider::{
    extract_stock_symbol, financial_advice, FinancialDataProvider, StubFinancialDataProvider,
    NO_SYMBOL_ERROR,
};
pub use response::generate_response;
