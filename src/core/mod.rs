//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod input;
pub mod log;
pub mod metrics;
pub mod pipeline;
pub mod price;

// Re-export main types for cleaner imports
pub use error::{CalcError, ErrorKind};
pub use metrics::{Band, MetricsResult};
pub use pipeline::{Calculator, Presenter};
pub use price::{HistoryProvider, PriceProvider, PriceSeries, SeriesOrigin};
