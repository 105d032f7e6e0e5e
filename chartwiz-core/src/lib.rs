//! ChartWiz Core: indicator catalog, selection, customization, assembly.
//!
//! This crate contains the composition engine behind the chart wizard:
//! - Domain types (categories, indicator descriptors, date ranges, payload)
//! - Date-range filtering of indicator series
//! - Paginated catalog state with stale-response discard
//! - Selection store with individual and group settings
//! - Chart-wide customization store
//! - Chart assembly and live preview data
//! - Report backend traits with HTTP and in-memory implementations

pub mod assembler;
pub mod catalog;
pub mod customize;
pub mod data;
pub mod domain;
pub mod filter;
pub mod preview;
pub mod search;
pub mod selection;

pub use assembler::{assemble, assemble_at, AssemblyError, AssemblyInput};
pub use catalog::{
    CatalogOptions, CatalogStatus, FetchMode, FetchRequest, FetchTicket, IndicatorCatalog,
    RequestToken, Resolution,
};
pub use customize::CustomizationStore;
pub use preview::{build_preview, ChartPreview};
pub use search::{Debouncer, IndicatorQuery, SortKey};
pub use selection::{GroupApplyReport, GroupKey, SelectionError, SelectionStore, ToggleOutcome};
