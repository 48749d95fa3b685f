use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::analysis::{
    ApiEnvelope, CachedAnalysisData, DailyData, DiagnosisData, FundFlowData, HealthStatus,
    OperationHistoryData, TechnicalData,
};
use crate::models::stock::StockInfo;
use crate::utils::http::build_api_client;

/// 诊断接口抽象，store 依赖此 trait 以便在测试中替换后端
#[async_trait]
pub trait DiagnoseApi: Send + Sync {
    async fn diagnose(
        &self,
        code: &str,
        user_preference: &str,
        force_refresh: bool,
    ) -> Result<ApiEnvelope<DiagnosisData>, ApiError>;
}

#[derive(Serialize)]
struct DiagnoseRequest<'a> {
    code: &'a str,
    user_preference: &'a str,
    force_refresh: bool,
}

/// 诊断后端 API client。
/// 每个方法对应一个后端接口，返回解码后的响应信封；
/// 信封内业务 code 的成功/失败判断交给调用方（store）。
/// 不做重试，不做本地校验。
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// base_url 形如 "http://127.0.0.1:5000/api"
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_api_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 解码响应。非 2xx 时尽量取出后端信封里的 message 作为错误信息。
    async fn decode<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiEnvelope<Value>>(&body) {
            Ok(envelope) if !envelope.message.is_empty() => {
                log::warn!("后端返回错误 ({}): {}", envelope.code, envelope.message);
                Err(ApiError::Backend {
                    code: envelope.code,
                    message: envelope.message,
                })
            }
            _ => Err(ApiError::Http {
                status: status.as_u16(),
            }),
        }
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        Self::decode(resp).await
    }

    /// 健康检查（该接口不走响应信封）
    pub async fn check_health(&self) -> Result<HealthStatus, ApiError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Http {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// 股票基本信息 + 实时行情
    pub async fn get_stock_info(&self, code: &str) -> Result<ApiEnvelope<StockInfo>, ApiError> {
        self.get_envelope(&format!("/stock/{}", code), &[]).await
    }

    /// 日线数据，days 控制窗口（后端默认60，上限250）
    pub async fn get_stock_daily(
        &self,
        code: &str,
        days: u32,
    ) -> Result<ApiEnvelope<DailyData>, ApiError> {
        self.get_envelope(
            &format!("/stock/{}/daily", code),
            &[("days", days.to_string())],
        )
        .await
    }

    /// 技术指标（MA/MACD/KDJ等，后端计算）
    pub async fn get_technical_indicators(
        &self,
        code: &str,
    ) -> Result<ApiEnvelope<TechnicalData>, ApiError> {
        self.get_envelope(&format!("/stock/{}/technical", code), &[])
            .await
    }

    /// 资金流向
    pub async fn get_fund_flow(&self, code: &str) -> Result<ApiEnvelope<FundFlowData>, ApiError> {
        self.get_envelope(&format!("/stock/{}/fund-flow", code), &[])
            .await
    }

    /// 个股诊断，核心接口。
    /// force_refresh 为 true 时后端跳过缓存重新调用 LLM。
    pub async fn diagnose_stock(
        &self,
        code: &str,
        user_preference: &str,
        force_refresh: bool,
    ) -> Result<ApiEnvelope<DiagnosisData>, ApiError> {
        let req = DiagnoseRequest {
            code,
            user_preference,
            force_refresh,
        };
        let resp = self
            .client
            .post(self.url("/analysis/diagnose"))
            .json(&req)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// 读取某只股票缓存的历史分析
    pub async fn get_cached_analysis(
        &self,
        code: &str,
    ) -> Result<ApiEnvelope<CachedAnalysisData>, ApiError> {
        self.get_envelope(&format!("/analysis/cache/{}", code), &[])
            .await
    }

    /// 清除后端诊断缓存
    pub async fn clear_cache(&self, code: &str) -> Result<ApiEnvelope<Value>, ApiError> {
        let resp = self
            .client
            .delete(self.url(&format!("/analysis/cache/{}", code)))
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// 记录用户操作（buy/sell/watch），payload 原样透传
    pub async fn record_operation(&self, payload: &Value) -> Result<ApiEnvelope<Value>, ApiError> {
        let resp = self
            .client
            .post(self.url("/analysis/operation"))
            .json(payload)
            .send()
            .await?;
        Self::decode(resp).await
    }

    /// 操作历史，code 为空表示不过滤；limit 由后端截断到 1-200
    pub async fn get_operation_history(
        &self,
        code: &str,
        limit: u32,
    ) -> Result<ApiEnvelope<OperationHistoryData>, ApiError> {
        self.get_envelope(
            "/analysis/operation/history",
            &[("code", code.to_string()), ("limit", limit.to_string())],
        )
        .await
    }
}

#[async_trait]
impl DiagnoseApi for ApiClient {
    async fn diagnose(
        &self,
        code: &str,
        user_preference: &str,
        force_refresh: bool,
    ) -> Result<ApiEnvelope<DiagnosisData>, ApiError> {
        self.diagnose_stock(code, user_preference, force_refresh)
            .await
    }
}
