use super::ui;
use crate::core::config::AppConfig;
use crate::core::insurance::{self, Policy};
use crate::store::userdata::{DataKind, UserData};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub async fn run(config: &AppConfig, userdata: &UserData, file: Option<&str>) -> Result<()> {
    let policies = match file {
        Some(path) => {
            let policies = insurance::load_policies(path)?;
            userdata
                .save(&config.profile, DataKind::Insurance, &policies)
                .await?;
            policies
        }
        None => userdata
            .load::<Vec<Policy>>(&config.profile, DataKind::Insurance)
            .await?
            .context("No saved policies found. Import a policy sheet with --file first.")?,
    };

    if policies.is_empty() {
        println!("No insurance policies found.");
        return Ok(());
    }

    println!("{}", display_policies(&policies, &config.currency));

    let today = chrono::Local::now().date_naive();
    let due = insurance::due_soon(&policies, today);
    if due.is_empty() {
        println!("\nNo policies due in the next 30 days.");
    } else {
        for policy in due {
            println!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "{} policy {} premium of {:.0} is due on {}.",
                        policy.policy_type,
                        policy.policy_number,
                        policy.premium_amount,
                        policy.due_date.format("%d-%b-%Y")
                    ),
                    ui::StyleType::Warning
                )
            );
        }
    }

    Ok(())
}

fn display_policies(policies: &[Policy], currency: &str) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Policy Type"),
        ui::header_cell("Policy Number"),
        ui::header_cell(&format!("Premium ({currency})")),
        ui::header_cell("Due Date"),
    ]);

    for policy in policies {
        table.add_row(vec![
            Cell::new(&policy.policy_type),
            Cell::new(&policy.policy_number),
            ui::amount_cell(format!("{:.0}", policy.premium_amount)),
            Cell::new(policy.due_date.format("%d-%b-%Y").to_string()),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Insurance Policies", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output
}
