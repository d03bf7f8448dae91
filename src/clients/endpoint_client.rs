/// 文本生成端点客户端
///
/// 封装所有与远程端点相关的调用逻辑：构建请求、重试、解码响应体
use crate::clients::retry::RetryPolicy;
use crate::config::EndpointConfig;
use crate::error::EndpointError;
use crate::models::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, CONTENT_TYPE};
use reqwest::Url;
use tracing::debug;

/// 补全服务
///
/// 批处理驱动器只依赖这个接口，测试中可以替换为脚本化的实现。
#[async_trait]
pub trait CompletionService {
    /// 发送一次请求（内部可以重试），返回解码后的响应
    async fn complete(&self, payload: &ChatRequest) -> Result<ChatResponse, EndpointError>;
}

/// 端点客户端
pub struct EndpointClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    api_version: String,
    retry: RetryPolicy,
}

impl EndpointClient {
    /// 创建新的端点客户端
    pub fn new(config: &EndpointConfig) -> Result<Self, EndpointError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|e| EndpointError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            retry: RetryPolicy::new(config.max_retries, config.backoff_factor),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// 构建请求（不发送）
    ///
    /// `POST <endpoint>?api-version=<version>`，凭据放在 `api-key` 请求头中
    pub fn build_request(&self, payload: &ChatRequest) -> Result<reqwest::Request, EndpointError> {
        self.http
            .post(self.endpoint.clone())
            .headers(self.headers()?)
            .query(&[("api-version", self.api_version.as_str())])
            .json(payload)
            .build()
            .map_err(|e| EndpointError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    /// 发送请求，按重试策略处理失败
    pub async fn send(&self, payload: &ChatRequest) -> Result<ChatResponse, EndpointError> {
        let target = self.endpoint.as_str();
        let payload_log = payload.to_log_string();

        self.retry
            .run(target, |attempt| {
                debug!(
                    "第 {} 次尝试: 请求 {}，payload: {}",
                    attempt + 1,
                    target,
                    payload_log
                );
                self.post_once(payload)
            })
            .await
    }

    /// 单次请求
    async fn post_once(&self, payload: &ChatRequest) -> Result<ChatResponse, EndpointError> {
        let endpoint = self.endpoint.to_string();
        let request = self.build_request(payload)?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| EndpointError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| EndpointError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(EndpointError::Status {
                endpoint,
                status,
                body,
            });
        }

        let value = serde_json::from_str(&body)
            .map_err(|source| EndpointError::Decode { endpoint, source })?;

        debug!("端点调用成功");
        Ok(ChatResponse(value))
    }

    fn headers(&self) -> Result<HeaderMap, EndpointError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let key = HeaderValue::from_str(&self.api_key).map_err(|e| {
            EndpointError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                reason: format!("api-key 无法作为请求头: {}", e),
            }
        })?;
        headers.insert("api-key", key);

        Ok(headers)
    }
}

#[async_trait]
impl CompletionService for EndpointClient {
    async fn complete(&self, payload: &ChatRequest) -> Result<ChatResponse, EndpointError> {
        self.send(payload).await
    }
}
