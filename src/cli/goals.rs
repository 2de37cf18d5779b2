use super::ui;
use crate::core::config::AppConfig;
use crate::core::goals::GoalOutlook;
use crate::store::userdata::{DataKind, UserData};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub async fn run(config: &AppConfig, userdata: &UserData) -> Result<()> {
    if config.goals.is_empty() {
        println!("No financial goals configured. Add goals to your config file to track them.");
        return Ok(());
    }

    let rate = config.projection.annual_return_rate;
    let mut outlooks: Vec<GoalOutlook> = Vec::with_capacity(config.goals.len());
    for goal in &config.goals {
        let outlook = goal
            .outlook(rate)
            .with_context(|| format!("Goal '{}' is misconfigured", goal.label))?;
        outlooks.push(outlook);
    }

    userdata
        .save(&config.profile, DataKind::Goals, &outlooks)
        .await?;

    println!("{}", display_outlooks(&outlooks, rate, &config.currency));
    Ok(())
}

fn display_outlooks(outlooks: &[GoalOutlook], rate: f64, currency: &str) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Goal"),
        ui::header_cell(&format!("Target ({currency})")),
        ui::header_cell("Saved"),
        ui::header_cell("Remaining"),
        ui::header_cell("Progress"),
        ui::header_cell("Years"),
        ui::header_cell("Invest / Year"),
    ]);

    for outlook in outlooks {
        let contribution = if outlook.yearly_contribution > 0.0 {
            format!("{:.0}", outlook.yearly_contribution)
        } else {
            "met".to_string()
        };

        table.add_row(vec![
            Cell::new(&outlook.label),
            ui::amount_cell(format!("{:.0}", outlook.target_amount)),
            ui::amount_cell(format!("{:.0}", outlook.current_amount)),
            ui::amount_cell(format!("{:.0}", outlook.remaining_amount)),
            ui::amount_cell(format!("{:.1}%", outlook.progress_pct)),
            ui::amount_cell(outlook.years.to_string()),
            ui::amount_cell(contribution),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Financial Goals", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nAssuming an average annual return of {:.1}% on new investments.",
        rate * 100.0
    ));

    output
}
