//! # Use Cases
//!
//! Application workflows built on the race resolver and bounded pipeline.
//!
//! - [`LookupAddressUseCase`]: CEP lookup raced across address providers
//! - [`FetchQuoteUseCase`]: server-side quote fetch and store
//! - [`ExportQuoteUseCase`]: client-side quote fetch and file export

pub mod export_quote;
pub mod fetch_quote;
pub mod lookup_address;

pub use export_quote::ExportQuoteUseCase;
pub use fetch_quote::{FetchQuoteUseCase, FetchedQuote};
pub use lookup_address::LookupAddressUseCase;
