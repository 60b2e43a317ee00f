use super::ui;
use crate::core::config::AppConfig;
use crate::core::input::{parse_base_investment, validate_base_investment};
use crate::core::{CalcError, Calculator, ErrorKind, MetricsResult, Presenter, SeriesOrigin};
use anyhow::Result;
use chrono::Local;
use indicatif::ProgressBar;
use std::cell::RefCell;

impl MetricsResult {
    pub fn display_as_table(&self, history_days: u32) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

        table.add_row(vec![
            "BTC price".into(),
            ui::currency_cell(self.current_price),
        ]);
        table.add_row(vec![
            format!("DCA cost ({history_days}d)").into(),
            ui::currency_cell(self.dca_cost),
        ]);
        table.add_row(vec![
            "Growth estimate".into(),
            ui::currency_cell(self.growth_estimate),
        ]);
        table.add_row(vec![
            "AHR999 index".into(),
            ui::index_cell(self.ahr999, self.band),
        ]);
        table.add_row(vec!["Valuation".into(), ui::band_cell(self.band)]);
        table.add_row(vec![
            "Recommended investment".into(),
            ui::currency_cell(self.recommended_investment),
        ]);

        let mut output = format!(
            "{}\n\n",
            ui::style_text("AHR999 Bitcoin DCA", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        if self.history_origin == SeriesOrigin::Synthetic {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    "Historical prices were unavailable; DCA cost uses synthetic data.",
                    ui::StyleType::Error
                )
            ));
        }

        output.push_str(&format!(
            "\n{} {}",
            ui::style_text("Last updated:", ui::StyleType::Label),
            ui::style_text(
                &Local::now().format("%b %-d, %Y, %I:%M %p").to_string(),
                ui::StyleType::Subtle
            )
        ));
        output
    }
}

/// Terminal presenter: a spinner while loading, then a table or JSON document.
struct TerminalPresenter {
    spinner: ProgressBar,
    json: bool,
    history_days: u32,
    failure: RefCell<Option<(ErrorKind, String)>>,
}

impl TerminalPresenter {
    fn new(json: bool, history_days: u32) -> Self {
        let spinner = if json {
            ProgressBar::hidden()
        } else {
            ui::new_spinner("Fetching market data...")
        };
        TerminalPresenter {
            spinner,
            json,
            history_days,
            failure: RefCell::new(None),
        }
    }

    fn take_failure(&self) -> Option<(ErrorKind, String)> {
        self.failure.borrow_mut().take()
    }
}

impl Presenter for TerminalPresenter {
    fn on_result(&self, result: &MetricsResult) {
        self.spinner.finish_and_clear();
        if self.json {
            match serde_json::to_string_pretty(result) {
                Ok(doc) => println!("{doc}"),
                Err(e) => self.on_error(ErrorKind::ComputationError, &e.to_string()),
            }
        } else {
            println!("{}", result.display_as_table(self.history_days));
        }
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        self.spinner.finish_and_clear();
        eprintln!("{}", ui::style_text(message, ui::StyleType::Error));
        *self.failure.borrow_mut() = Some((kind, message.to_string()));
    }
}

/// Runs one calculation and renders it. The returned error has already been shown.
pub async fn run(config: &AppConfig, base: Option<&str>, json: bool) -> Result<()> {
    let presenter = TerminalPresenter::new(json, config.history_days);

    let base_amount = match base {
        Some(raw) => parse_base_investment(raw),
        None => validate_base_investment(config.base_investment),
    };

    match base_amount {
        Ok(amount) => {
            let calculator = Calculator::from_config(config)?;
            calculator.on_calculate_requested(amount, &presenter).await;
        }
        Err(e) => presenter.on_error(e.kind(), &e.to_string()),
    }

    match presenter.take_failure() {
        Some((ErrorKind::InvalidInput, message)) => Err(CalcError::InvalidInput(message).into()),
        Some((ErrorKind::DataUnavailable, message)) => {
            Err(CalcError::DataUnavailable(message).into())
        }
        Some((ErrorKind::ComputationError, message)) => {
            Err(CalcError::Computation(message).into())
        }
        None => Ok(()),
    }
}
