mod load;
mod types;

pub use load::{
    apply_env_overrides, get_data_dir, load_default, load_file, ENV_API_KEY, ENV_BASE_URL,
    ENV_MODEL, ENV_ORGANIZATION,
};
pub use types::{
    AgentConfig, AppConfig, LoggingConfig, OutputConfig, PollingConfig, ServiceConfig,
    DEFAULT_BASE_URL,
};
