//! 指数退避重试策略
//!
//! 第 `attempt` 次（从0开始）失败后等待 `backoff_factor * 2^attempt` 秒，
//! 包括首次在内最多尝试 `max_attempts` 次。

use crate::error::EndpointError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_factor: f64,
}

impl RetryPolicy {
    /// `max_attempts` 小于 1 时按 1 处理
    pub fn new(max_attempts: u32, backoff_factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_factor: backoff_factor.max(0.0),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 第 `attempt` 次失败后的等待时长
    ///
    /// 结果超出 `Duration` 表示范围时取 `Duration::MAX`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff_factor == 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_factor * 2f64.powi(exponent))
            .unwrap_or(Duration::MAX)
    }

    /// 按策略执行操作
    ///
    /// 不可重试的错误立即返回；可重试的错误在耗尽次数后返回最后一次的错误。
    pub async fn run<F, Fut, T>(&self, target: &str, mut op: F) -> Result<T, EndpointError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, EndpointError>>,
    {
        let mut attempt = 0;

        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        info!("{} 在第 {} 次尝试后成功", target, attempt + 1);
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => {
                    error!("{} 请求失败（不可重试）: {}", target, e);
                    return Err(e);
                }
                Err(e) => {
                    if attempt + 1 >= self.max_attempts {
                        error!("{} 请求在 {} 次尝试后仍然失败: {}", target, self.max_attempts, e);
                        return Err(e);
                    }

                    let delay = self.delay_for(attempt);
                    warn!(
                        "{} 请求失败: {}，{:.2} 秒后重试",
                        target,
                        e,
                        delay.as_secs_f64()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 0.5)
    }
}
