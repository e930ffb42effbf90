pub mod config;
pub mod logging;

pub use config::{
    AppConfig, CliArgs, CmsConfig, DatabaseConfig, EmailConfig, IdentityConfig, LoggingConfig,
    MirrorConfig, ServerConfig, StorageConfig,
};
