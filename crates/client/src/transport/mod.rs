//! Transport layer for the ERPNext client.

pub mod http;

pub use http::{envelope, HttpTransport, QueryPairs, TransportResult};
