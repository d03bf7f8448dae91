use thiserror::Error;

/// 应用程序错误类型
///
/// 只有初始化阶段（配置、输入文件、输出文件）的错误会以 `AppError` 的形式
/// 向上传播并终止运行；单元格级别的错误由批处理驱动器自行消化。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 表格文件读写错误
    #[error("文件错误: {0}")]
    Tabular(#[from] TabularError),
    /// 端点客户端构建失败
    #[error("端点错误: {0}")]
    Endpoint(#[from] EndpointError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 配置解析失败（缺少字段或类型不符）
    #[error("JSON 配置解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 配置解析失败（缺少字段或类型不符）
    #[error("TOML 配置解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 字段值不合法
    #[error("配置项 `{key}` 不合法: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// 端点调用错误
#[derive(Debug, Error)]
pub enum EndpointError {
    /// 网络层失败（连接、超时、读取响应体）
    #[error("请求 {endpoint} 失败: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 2xx 状态码
    #[error("请求 {endpoint} 返回状态码 {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },
    /// 2xx 响应体不是合法 JSON
    #[error("无法解析 {endpoint} 的响应体: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// 端点地址或请求头无法构建
    #[error("无效的端点配置 {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl EndpointError {
    /// 是否值得重试（网络或状态码失败）
    pub fn is_retryable(&self) -> bool {
        matches!(self, EndpointError::Transport { .. } | EndpointError::Status { .. })
    }
}

/// 结构化数据提取失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// 文本中没有 ```json 起始标记
    #[error("响应中没有找到 ```json 代码块")]
    MissingFence,
    /// 响应缺少 choices[0].message.content
    #[error("响应中缺少 choices[0].message.content")]
    MissingContent,
}

/// 单元格级别错误
///
/// 批处理驱动器遇到它时只跳过当前单元格，不会中止整批任务。
#[derive(Debug, Error)]
pub enum CellError {
    /// 端点调用在重试耗尽后仍然失败
    #[error("端点通信失败: {0}")]
    Endpoint(#[from] EndpointError),
    /// 响应内容无法提取
    #[error("提取失败: {source} (payload: {payload}, response: {response})")]
    Extraction {
        #[source]
        source: ExtractionFailure,
        payload: String,
        response: String,
    },
}

/// 表格文件读写错误
#[derive(Debug, Error)]
pub enum TabularError {
    /// 打开或创建文件失败
    #[error("无法打开文件 {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// 某一行无法解析
    #[error("文件 {path} 第 {row} 行解析失败: {source}")]
    Row {
        path: String,
        row: usize,
        #[source]
        source: csv::Error,
    },
    /// 写入失败
    #[error("写入文件 {path} 失败: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// 目录或刷新失败
    #[error("文件操作失败 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
