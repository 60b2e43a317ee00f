pub mod calculate;
pub mod setup;
pub mod ui;
