//! Query construction and evaluation
//!
//! Filters and the minimal query DSL the store accepts: plain
//! collection lists, single field filters, and AND composites. The
//! same [`Filter`] drives both read tiers, so server-side structured
//! queries and client-side scans agree on what matches.

mod builder;
mod filter;

pub use builder::{
    build_list_request, build_query_request, collect_listed_documents, collect_query_documents,
    StoreRequest,
};
pub use filter::{matches_all, Filter, FilterOperator};
