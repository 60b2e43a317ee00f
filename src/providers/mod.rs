pub mod blockchain;
pub mod coincap;
pub mod coingecko;
pub mod fallback;
pub mod history;
pub mod util;

pub use fallback::FallbackPriceSource;
pub use history::HistoricalDataSource;
