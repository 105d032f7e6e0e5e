//! Report backend access: collaborator traits, wire parsing, transports.

pub mod circuit_breaker;
pub mod fixture;
pub mod http;
pub mod provider;
pub mod wire;

pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use fixture::{BlockWrite, FixtureSource};
pub use http::{HttpBackend, HttpConfig};
pub use provider::{
    IndicatorConfigRecord, IndicatorConfigStore, IndicatorPage, IndicatorSource, PageRequest,
    Pagination, ReportBlocks, SourceError,
};
