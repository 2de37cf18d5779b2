use super::ui;
use crate::core::config::AppConfig;
use crate::core::ledger::{self, SchemePosition};
use crate::core::nav::NavProvider;
use crate::core::statement;
use crate::core::transaction::{self, Operation};
use crate::core::valuation::{self, PortfolioValuation, PriceSource};
use crate::store::userdata::{DataKind, UserData};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::collections::HashMap;
use tracing::warn;

pub async fn run(
    config: &AppConfig,
    userdata: &UserData,
    provider: &(dyn NavProvider + Send + Sync),
    statement_path: Option<&str>,
) -> Result<()> {
    let positions = match statement_path {
        Some(path) => {
            let positions = reconcile_statement(path)?;
            userdata
                .save(&config.profile, DataKind::Holdings, &positions)
                .await?;
            positions
        }
        None => userdata
            .load::<HashMap<String, SchemePosition>>(&config.profile, DataKind::Holdings)
            .await?
            .context("No saved holdings found. Import a statement with --statement first.")?,
    };

    if positions.is_empty() {
        println!("No holdings data found in the statement.");
        return Ok(());
    }

    let pb = ui::new_spinner("Refreshing NAVs...");
    let valuation = valuation::value_positions(&positions, provider).await;
    pb.finish_and_clear();

    println!("{}", display_valuation(&valuation, &config.currency));
    Ok(())
}

/// Loads a statement and folds it into positions. Records that fail
/// normalization are skipped and logged rather than aborting the import.
fn reconcile_statement(path: &str) -> Result<HashMap<String, SchemePosition>> {
    let records = statement::load_statement(path)?;

    let mut operations: Vec<Operation> = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for (index, record) in records.iter().enumerate() {
        match transaction::normalize(record, index) {
            Ok(op) => operations.push(op),
            Err(e) => {
                warn!("Skipping statement record: {e}");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        eprintln!(
            "{}",
            ui::style_text(
                &format!("Skipped {skipped} malformed statement record(s), run with --verbose for details"),
                ui::StyleType::Warning
            )
        );
    }

    Ok(ledger::reconcile(&operations))
}

fn display_valuation(valuation: &PortfolioValuation, currency: &str) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Scheme"),
        ui::header_cell("Units"),
        ui::header_cell("NAV"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("Weight (%)"),
        ui::header_cell("Price"),
    ]);

    for holding in &valuation.holdings {
        let weight = holding
            .weight_pct
            .map_or("N/A".to_string(), |w| format!("{w:.2}%"));

        table.add_row(vec![
            Cell::new(&holding.scheme_name),
            ui::amount_cell(format!("{:.2}", holding.units)),
            ui::amount_cell(format!("{:.2}", holding.nav)),
            ui::amount_cell(format!("{:.2}", holding.value)),
            ui::amount_cell(weight),
            ui::source_cell(holding.source == PriceSource::Live),
        ]);
    }

    let mut output = format!(
        "Portfolio: {}\n\n",
        ui::style_text("Holdings", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nTotal Portfolio Value ({}): {}",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{:.2}", valuation.total_value),
            ui::StyleType::TotalValue
        )
    ));

    output
}
