use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
}

impl Config {
    pub fn new(base_url: String, api_key: String) -> Self {
        Config { base_url, api_key }
    }

    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("nl", "bezetting", "bezetting")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        if !config_path.exists() {
            return Err(anyhow!("Config file does not exist"));
        }

        let config_data = fs::read_to_string(&config_path)
            .map_err(|e| anyhow!("Failed to read config file: {}", e))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| anyhow!("Failed to parse config: {}", e))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, config_data)
            .map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        Ok(())
    }

    pub fn prompt_for_base_url() -> String {
        println!("Please enter the base URL of your project dashboard:");
        println!("Example: https://dashboard.example.nl");

        let mut base_url = String::new();
        io::stdin()
            .read_line(&mut base_url)
            .expect("Failed to read input");
        base_url.trim().trim_end_matches('/').to_string()
    }

    pub fn prompt_for_api_key() -> String {
        println!("Please enter your dashboard API key:");
        println!("You can create one under Settings > API access on the dashboard.");
        println!("Note: Your API key will be stored in your system's config directory.");

        let mut api_key = String::new();
        io::stdin()
            .read_line(&mut api_key)
            .expect("Failed to read input");
        api_key.trim().to_string()
    }
}
