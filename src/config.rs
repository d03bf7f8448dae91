use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// 退避系数上限（秒）
pub const MAX_BACKOFF_FACTOR: f64 = 3600.0;

/// 程序配置文件
///
/// 来自一个扁平的键值文档（JSON 或 TOML），加载时一次性校验，
/// 缺少字段、类型不符或取值非法都会立即报错。
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// 提示词 CSV 文件
    pub prompt_file: PathBuf,
    /// 报告 CSV 文件
    pub report_file: PathBuf,
    /// 输出目录
    pub output_dir: PathBuf,
    /// 整个交叉积重复执行的轮数
    pub iterations: u32,
    // --- 端点配置 ---
    pub endpoint: String,
    #[serde(rename = "api-key")]
    pub api_key: String,
    pub api_version: String,
    pub model: String,
    // --- 日志配置 ---
    /// 0=关闭 1=debug 2=info 3=warn 4/5=error
    #[serde(default = "default_log_level")]
    pub log_level: u8,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    // --- 重试配置 ---
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// 单位：秒
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

/// 端点客户端所需的全部配置
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub max_retries: u32,
    pub backoff_factor: f64,
}

fn default_log_level() -> u8 {
    2
}

fn default_log_file() -> PathBuf {
    PathBuf::from("app.log")
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    0.5
}

impl Config {
    /// 从文件加载配置，`.toml` 扩展名按 TOML 解析，其余按 JSON 解析
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path_str.clone(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config: Config = if is_toml {
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path_str,
                source,
            })?
        } else {
            serde_json::from_str(&content).map_err(|source| ConfigError::JsonParseFailed {
                path: path_str,
                source,
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// 校验各字段取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(invalid("iterations", "必须是正整数"));
        }
        if self.max_retries == 0 {
            return Err(invalid("max_retries", "至少需要 1 次尝试"));
        }
        if !(0.0..=MAX_BACKOFF_FACTOR).contains(&self.backoff_factor) {
            return Err(invalid(
                "backoff_factor",
                format!("取值范围为 0-{} 秒", MAX_BACKOFF_FACTOR),
            ));
        }
        if self.log_level > 5 {
            return Err(invalid("log_level", "取值范围为 0-5"));
        }

        for (key, value) in [
            ("api-key", &self.api_key),
            ("api_version", &self.api_version),
            ("model", &self.model),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(key, "不能为空"));
            }
        }
        for (key, value) in [
            ("prompt_file", &self.prompt_file),
            ("report_file", &self.report_file),
            ("output_dir", &self.output_dir),
        ] {
            if value.as_os_str().is_empty() {
                return Err(invalid(key, "不能为空"));
            }
        }

        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| invalid("endpoint", format!("无法解析 URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "endpoint",
                format!("不支持的协议: {}", url.scheme()),
            ));
        }

        Ok(())
    }

    /// 端点客户端配置
    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            api_version: self.api_version.clone(),
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
        }
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: reason.into(),
    }
}
