pub mod persistence;
pub mod theme;

pub use persistence::{database_path, log_path, AppConfig, Database};
pub use theme::Theme;
