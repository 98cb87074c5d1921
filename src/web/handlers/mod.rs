//! Request handlers for the catalog web API.

pub mod products;
