mod server;

pub use server::{ConfigFile, ServerConfig, load_config_file};
