/// Configuration loaded from environment variables
#[derive(Debug, Default)]
pub struct Config {
    pub data_path: Option<String>,
    pub settings_path: Option<String>,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Config {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config {
        data_path: std::env::var("CROSSFILTER_DATA").ok(),
        settings_path: std::env::var("CROSSFILTER_SETTINGS").ok(),
    }
}
