use std::env;

/// Frontend directory shipped with the server
pub const DEFAULT_STATIC_DIR: &str = "app/static";

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Where rendered `.dot`, `.png` and `.svg` files are written
    pub diagrams_dir: String,
    pub dot_binary: String,
    pub static_dir: String,
    pub sample_config_path: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8000"),
            diagrams_dir: get_env("DIAGRAMS_DIR", "generated_diagrams"),
            dot_binary: get_env("DOT_BINARY", "dot"),
            static_dir: get_env("STATIC_DIR", DEFAULT_STATIC_DIR),
            sample_config_path: get_env("SAMPLE_CONFIG_PATH", "test-configs/ex3300-1.conf"),
            max_upload_bytes: get_env("MAX_UPLOAD_BYTES", "10485760")
                .parse()
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
