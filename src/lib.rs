pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::providers::OfflineNavProvider;
use crate::providers::amfi_nav::AmfiNavProvider;
use crate::store::KeyValueStore;
use crate::store::userdata::UserData;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Application commands, decoupled from the clap surface in the binary.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Holdings {
        statement: Option<String>,
        offline: bool,
    },
    Goals,
    Insurance {
        file: Option<String>,
    },
    Reset,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("mfolio starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = Arc::new(match config.default_data_path() {
        Ok(path) => KeyValueStore::open(&path),
        Err(_) => KeyValueStore::in_memory(),
    });
    let userdata = UserData::new(Arc::clone(&store));

    match command {
        AppCommand::Holdings { statement, offline } => {
            if offline {
                cli::holdings::run(&config, &userdata, &OfflineNavProvider, statement.as_deref())
                    .await
            } else {
                let base_url = config
                    .providers
                    .amfi
                    .as_ref()
                    .map_or("https://mf.captnemo.in", |p| p.base_url.as_str());
                let provider = AmfiNavProvider::new(base_url, &store);
                cli::holdings::run(&config, &userdata, &provider, statement.as_deref()).await
            }
        }
        AppCommand::Goals => cli::goals::run(&config, &userdata).await,
        AppCommand::Insurance { file } => {
            cli::insurance::run(&config, &userdata, file.as_deref()).await
        }
        AppCommand::Reset => {
            userdata.clear(&config.profile).await;
            println!("Cleared saved data for profile {}", config.profile);
            Ok(())
        }
    }
}
