pub mod client;
pub mod error;
pub mod pager;
pub mod settings;
pub mod types;

pub use client::CatalogClient;
pub use error::FetchError;
pub use pager::{
    FetchProgress, PageSource, SilentProgress, fetch_all, fetch_catalog, progress_percent,
};
pub use settings::{
    RemoteConfig, SettingSource, SettingSources, Settings, default_data_dir, settings_path,
};
pub use types::{PageData, PageEnvelope};
