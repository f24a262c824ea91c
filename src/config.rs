// Timezone label localizer, (c) 2022-2024 Georg Brandl.
// Licensed under the GNU AGPL, version 3 or later.

//! Definitions for the tool configuration.

use std::{fs::File, path::Path, time::Duration};
use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_phrase")]
    pub phrase: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_zone")]
    pub zone: String,
    #[serde(default = "default_dir_marker")]
    pub dir_marker: String,
    #[serde(default = "default_default_lang")]
    pub default_lang: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_labels_marker")]
    pub labels_marker: String,
    #[serde(default = "default_values_marker")]
    pub values_marker: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        // all fields have serde defaults
        serde_json::from_str("{}").expect("settings defaults")
    }
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        serde_json::from_reader(File::open(path.as_ref())?)
            .context("deserializing settings")
    }

    pub fn make_agent(&self) -> Result<ureq::Agent> {
        let proxy = if let Some(proxy) = &self.proxy {
            Some(ureq::Proxy::new(proxy).context("invalid proxy URL")?)
        } else {
            None
        };
        Ok(ureq::config::Config::builder()
            .timeout_connect(Some(Duration::from_secs(3)))
            .timeout_global(Some(Duration::from_secs(self.timeout_secs)))
            .proxy(proxy)
            .build().into())
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        match &*self.log_level {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            s => {
                log::error!("invalid log level {}", s);
                log::LevelFilter::Info
            }
        }
    }
}

fn default_endpoint() -> String { "http://translate.google.com/translate_t".into() }
fn default_timeout() -> u64 { 30 }
fn default_user_agent() -> String { "Mozilla/5.001 (windows; U; NT4.0; en-us) Gecko/25250101".into() }
fn default_accept_language() -> String { "en-us,en;q=0.5".into() }
fn default_source_lang() -> String { "pt".into() }
fn default_phrase() -> String { "Vou a Recife".into() }
fn default_city() -> String { "Recife".into() }
fn default_zone() -> String { "America/Recife".into() }
fn default_dir_marker() -> String { "values".into() }
fn default_default_lang() -> String { "en".into() }
fn default_file_name() -> String { "arrays.xml".into() }
fn default_labels_marker() -> String { r#"name="timezone_labels""#.into() }
fn default_values_marker() -> String { r#"name="timezone_values""#.into() }
fn default_log_level() -> String { "info".into() }

#[test]
fn test_partial_settings() {
    let settings: Settings = serde_json::from_str(
        r#"{"endpoint": "http://localhost:8080/t", "city": "Olinda", "log_level": "debug"}"#
    ).unwrap();
    assert_eq!(settings.endpoint, "http://localhost:8080/t");
    assert_eq!(settings.city, "Olinda");
    assert_eq!(settings.zone, "America/Recife");
    assert_eq!(settings.file_name, "arrays.xml");
    assert_eq!(settings.log_filter(), log::LevelFilter::Debug);
    assert_eq!(Settings::default().phrase, "Vou a Recife");
}
