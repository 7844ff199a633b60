use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use mdexport::config::{find_config_file, read_config, Config, CFG_FILE_NAME};

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(|| find_config_file(CFG_FILE_NAME)) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find {} configuration", CFG_FILE_NAME)),
    };

    println!("Current dir: {}", env::current_dir()?.display());
    println!("Reading config from {}", config_path.display());
    let mut config = read_config(&config_path)?;

    if let Some(mut log) = config.log {
        if log.location.is_none() && !log.log_to_console {
            let location = dirs::cache_dir()
                .ok_or_else(|| anyhow!("Could not find the user cache dir"))?
                .join("mdexport").join("log").join("server.log");
            log.location = Some(location);
        }
        match log.location {
            Some(ref location) => println!("Log enabled. Files will be written in {}", location.display()),
            None => println!("Log enabled. Using stdout"),
        }
        config.log = Some(log);
    } else {
        println!("Log disabled. Using stdout");
    }

    if config.admin.key.is_empty() {
        println!("Admin key is empty. Nobody will be able to export posts");
    }

    Ok(config)
}
