//! 网关 API 客户端 - 基础设施层
//!
//! 封装与远端网关两个接口的全部调用逻辑：
//! - `/get_global_contribs`：按用户名（可带续传游标表）取一页全局贡献
//! - `/rollback_all`：回退一条编辑（每次请求只带一条）
//!
//! 网关持有 OAuth 会话，本客户端不做任何鉴权。
//! 任何请求只尝试一次，不在这一层重试。

use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ContinuationMap, ContribPage, Edit, RollbackOutcome, RollbackResponse};

/// 请求头中标识本工具的 User-Agent
const USER_AGENT: &str = "GlobalMassRollback/1.1";

/// 贡献查询能力
#[async_trait::async_trait]
pub trait ContribGateway: Send + Sync {
    /// 取一页全局贡献
    ///
    /// `continuation` 为 `None` 表示首页；`Some` 时把游标表
    /// 序列化进请求（即使表为空也照常发出）。
    async fn fetch_contribs(
        &self,
        username: &str,
        continuation: Option<&ContinuationMap>,
    ) -> AppResult<ContribPage>;
}

/// 回退执行能力
#[async_trait::async_trait]
pub trait RollbackGateway: Send + Sync {
    /// 回退一条编辑，返回该条的结果
    async fn rollback(&self, edit: &Edit) -> AppResult<RollbackOutcome>;
}

/// 网关客户端
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// 创建新的网关客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ContribGateway for GatewayClient {
    async fn fetch_contribs(
        &self,
        username: &str,
        continuation: Option<&ContinuationMap>,
    ) -> AppResult<ContribPage> {
        let endpoint = format!("{}/get_global_contribs", self.base_url);

        let mut form: Vec<(&str, String)> = vec![("username", username.to_string())];
        if let Some(map) = continuation {
            form.push(("uccontinue_map", serde_json::to_string(map)?));
        }

        debug!("POST {} (续传: {})", endpoint, continuation.is_some());

        let response = self
            .client
            .post(&endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let page: ContribPage = response
            .json()
            .await
            .map_err(|e| AppError::json_parse_failed(e))?;

        debug!(
            "收到 {} 条编辑，{} 个站点有续传游标",
            page.edits.len(),
            page.next_uccontinue_map.len()
        );

        Ok(page)
    }
}

#[async_trait::async_trait]
impl RollbackGateway for GatewayClient {
    async fn rollback(&self, edit: &Edit) -> AppResult<RollbackOutcome> {
        let endpoint = format!("{}/rollback_all", self.base_url);

        // 网关契约固定为编辑列表，这里始终只装一条
        let body = serde_json::json!({ "edits": [edit] });

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let parsed: RollbackResponse = response
            .json()
            .await
            .map_err(|e| AppError::json_parse_failed(e))?;

        if !parsed.success {
            return Err(AppError::bad_response(&endpoint, parsed.message));
        }

        parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::empty_response(&endpoint))
    }
}
