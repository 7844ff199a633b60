use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use chrono::Duration;
use serde::Deserialize;

use crate::export::orchestrator::{ConversionPolicy, ExportSettings};

pub const CFG_FILE_NAME: &str = "mdexport.toml";
const DEFAULT_INDEX_BASE_NAME: &str = "index";
const DEFAULT_NONCE_LIFETIME_SECS: i64 = 12 * 60 * 60;

#[derive(Deserialize)]
pub struct Paths {
    pub posts_dir: PathBuf,
    /// Overrides for the built-in page templates
    pub template_dir: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
pub struct Defaults {
    pub index_base_name: Option<String>,
}

#[derive(Deserialize)]
pub struct Site {
    /// Public root of the blog, used for permalinks and absolute image links
    pub url: String,
}

#[derive(Deserialize)]
pub struct Admin {
    pub key: String,
    pub nonce_lifetime_secs: Option<i64>,
}

#[derive(Deserialize, Default)]
pub struct Export {
    pub temp_dir: Option<PathBuf>,
    pub on_conversion_error: Option<ConversionPolicy>,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub defaults: Defaults,
    pub site: Site,
    pub admin: Admin,
    #[serde(default)]
    pub export: Export,
    pub server: Server,
    pub log: Option<Log>,
}

impl Config {
    pub fn index_base_name(&self) -> &str {
        self.defaults.index_base_name.as_deref().unwrap_or(DEFAULT_INDEX_BASE_NAME)
    }

    pub fn nonce_lifetime(&self) -> Duration {
        Duration::seconds(self.admin.nonce_lifetime_secs.unwrap_or(DEFAULT_NONCE_LIFETIME_SECS))
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            temp_dir: self.export.temp_dir.clone(),
            on_conversion_error: self.export.on_conversion_error.unwrap_or_default(),
        }
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    let Some(str_path) = path.to_str() else {
        return Ok(path);
    };
    if !str_path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .and_then(|dir| dir.to_str())
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Could not find the executable directory"))?;
    Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        template_dir: cfg.paths.template_dir.map(parse_path).transpose()?,
    };
    cfg.export.temp_dir = cfg.export.temp_dir.map(parse_path).transpose()?;
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path).transpose()?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

/// Looks for `file_name` next to the executable, in the current directory and
/// in the user config directory, in this order.
pub fn find_config_file(file_name: &str) -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|dir| dir.to_path_buf()));
    let candidates = [exe_dir, env::current_dir().ok(), dirs::config_dir()];

    candidates.into_iter()
        .flatten()
        .map(|dir| dir.join(file_name))
        .find(|path| path.exists())
}

pub const SAMPLE_CONFIG: &str = r#"# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
posts_dir = "posts"
# Directory with login.tpl and export.tpl replacing the built-in pages
# template_dir = "template"

# Default file name if using directory instead of files
[defaults]
index_base_name = "index"

[site]
url = "https://example.com"

[admin]
key = "change-me"
# How long an export form stays valid
nonce_lifetime_secs = 43200

[export]
# temp_dir = "/var/tmp"
# skip or abort
on_conversion_error = "skip"

[server]
address = "127.0.0.1"
port = 8002

[log]
level = "Info"
log_to_console = true
# location = "${exe_dir}/logs/mdexport.log"
"#;

pub fn write_sample_config(file_path: &Path) -> io::Result<()> {
    fs::write(file_path, SAMPLE_CONFIG)
}
