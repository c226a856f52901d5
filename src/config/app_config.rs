// ==========================================
// AEO 供应链数据看板 - 应用配置
// ==========================================
// 来源优先级: 环境变量 > TOML 配置文件 > 内置默认值
// 配置文件: $AEO_DASHBOARD_CONFIG，否则 config/dashboard.toml（存在时）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件路径环境变量
pub const ENV_CONFIG_PATH: &str = "AEO_DASHBOARD_CONFIG";
/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "AEO_DASHBOARD_DB_PATH";
/// Excel 路径环境变量
pub const ENV_EXCEL_PATH: &str = "AEO_DASHBOARD_EXCEL_PATH";
/// 监听地址环境变量
pub const ENV_HOST: &str = "AEO_DASHBOARD_HOST";
/// 监听端口环境变量
pub const ENV_PORT: &str = "AEO_DASHBOARD_PORT";

/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "config/dashboard.toml";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value})")]
    ValueError { key: String, value: String },
}

// ==========================================
// AppConfig
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数；0 表示使用 actix 默认值
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// 已转换的 SQLite 文件（优先）
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Excel 源文件
    #[serde(default = "default_excel_path")]
    pub excel_path: PathBuf,
    /// CSV 源文件（可选）
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
    /// Excel 工作表名
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// 指定主数据表名（可选，不存在时自动选择）
    #[serde(default)]
    pub table: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            excel_path: default_excel_path(),
            csv_path: None,
            sheet_name: default_sheet_name(),
            table: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 启动时预计算图表缓存
    #[serde(default)]
    pub warm_on_startup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_limit")]
    pub default_limit: i64,
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data/data-aeo.db")
}

fn default_excel_path() -> PathBuf {
    PathBuf::from("data/data-aeo.xlsx")
}

fn default_sheet_name() -> String {
    "Output".to_string()
}

fn default_page_limit() -> i64 {
    1000
}

fn default_max_limit() -> i64 {
    10_000
}

impl AppConfig {
    /// 从 TOML 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::ReadError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// 加载配置（配置文件 + 环境变量覆写）
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_file(path.trim())?,
            _ if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from_file(DEFAULT_CONFIG_FILE)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 环境变量覆写（注入读取函数，便于测试）
    pub fn apply_env_overrides<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = non_empty(ENV_DB_PATH) {
            self.data.db_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_EXCEL_PATH) {
            self.data.excel_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(ENV_HOST) {
            self.server.host = v;
        }
        if let Some(v) = non_empty(ENV_PORT) {
            self.server.port = v.parse::<u16>().map_err(|_| ConfigError::ValueError {
                key: ENV_PORT.to_string(),
                value: v.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.data.sheet_name, "Output");
        assert_eq!(config.pagination.default_limit, 1000);
        assert!(!config.cache.warm_on_startup);
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9001\n\n[data]\nsheet_name = \"Sheet1\"\n\n[cache]\nwarm_on_startup = true").unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.data.sheet_name, "Sheet1");
        assert_eq!(config.data.db_path, PathBuf::from("data/data-aeo.db"));
        assert!(config.cache.warm_on_startup);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(ENV_PORT, "8080"), (ENV_DB_PATH, "/tmp/x.db"), (ENV_HOST, " ")]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.data.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_env_override_bad_port() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(|k| (k == ENV_PORT).then(|| "abc".to_string()));
        assert!(matches!(result, Err(ConfigError::ValueError { .. })));
    }
}
