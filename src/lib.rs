//! alquistore - typed REST client for the Alquilala document store
//!
//! A thin, stateless shim over the store's document REST API: a value
//! codec for the tagged wire format, a document mapper, a minimal query
//! builder, and an access-mode client with authenticated and public
//! variants of every operation.

pub mod cli;
pub mod client;
pub mod document;
pub mod observability;
pub mod query;
pub mod value;
