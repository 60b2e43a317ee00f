use crate::core::Band;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

pub fn currency_cell(value: f64) -> Cell {
    Cell::new(format_currency(value)).set_alignment(CellAlignment::Right)
}

pub fn band_color(band: Band) -> Color {
    match band {
        Band::SeverelyUndervalued => Color::Green,
        Band::Undervalued => Color::Blue,
        Band::FairValue => Color::Yellow,
        Band::Overvalued => Color::Red,
    }
}

/// Index value coloured by its valuation band.
pub fn index_cell(value: f64, band: Band) -> Cell {
    Cell::new(format!("{value:.2}"))
        .fg(band_color(band))
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

pub fn band_cell(band: Band) -> Cell {
    Cell::new(band.to_string())
        .fg(band_color(band))
        .set_alignment(CellAlignment::Right)
}

/// Creates a ticking spinner shown while market data loads.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
