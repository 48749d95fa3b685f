use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stock::StockInfo;

/// 后端统一响应信封 {code, message, data}
///
/// 注意这里的 code 是业务状态码（200 表示成功），与 HTTP 状态码独立。
/// 失败时后端返回 data: null。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

/// 个股诊断结果：行情快照 + LLM 分析报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisData {
    pub stock_info: StockInfo,
    /// LLM 生成的结构化分析，客户端不解释其内容
    pub analysis: Value,
    /// 是否命中后端缓存
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// /api/stock/{code}/daily 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyData {
    pub code: String,
    pub days: i64,
    pub daily: Vec<Value>,
}

/// /api/stock/{code}/technical 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalData {
    pub code: String,
    pub indicators: Value,
}

/// /api/stock/{code}/fund-flow 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundFlowData {
    pub code: String,
    pub fund_flow: Value,
}

/// /api/analysis/cache/{code} 响应（读取缓存的历史分析）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAnalysisData {
    pub code: String,
    pub caches: Vec<Value>,
}

/// /api/analysis/operation/history 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationHistoryData {
    pub total: i64,
    pub operations: Vec<Value>,
}

/// /api/health 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let env: ApiEnvelope<DiagnosisData> = serde_json::from_str(
            r#"{
                "code": 200,
                "message": "success",
                "data": {
                    "stock_info": {"code": "600000", "name": "浦发银行", "current_price": 10.5, "change_pct": 1.2},
                    "analysis": {"trend": "上行", "advice": "持有"},
                    "cached": false,
                    "generated_at": "2025-01-01T09:30:00"
                }
            }"#,
        )
        .unwrap();
        assert!(env.is_success());
        let data = env.data.unwrap();
        assert_eq!(data.stock_info.name, "浦发银行");
        assert!(!data.cached);
        assert_eq!(data.analysis["advice"], "持有");
    }

    #[test]
    fn test_envelope_failure_with_null_data() {
        let env: ApiEnvelope<DiagnosisData> =
            serde_json::from_str(r#"{"code": 500, "message": "诊断失败: LLM服务不可用", "data": null}"#)
                .unwrap();
        assert!(!env.is_success());
        assert!(env.data.is_none());
    }

    #[test]
    fn test_envelope_missing_optional_fields() {
        // message/data 字段缺失时应能解析
        let env: ApiEnvelope<Value> = serde_json::from_str(r#"{"code": 200}"#).unwrap();
        assert!(env.is_success());
        assert!(env.message.is_empty());
        assert!(env.data.is_none());
    }
}
