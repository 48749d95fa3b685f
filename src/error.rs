use thiserror::Error;

/// 诊断失败时的兜底文案
pub const DIAGNOSIS_FAILED: &str = "诊断失败";

/// 客户端错误，分两层：传输层失败与后端业务信封失败
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络错误、超时、响应体解码失败，均由 reqwest 产生
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 非 2xx 且响应体中无可用的后端 message
    #[error("HTTP 状态异常: {status}")]
    Http { status: u16 },

    /// 后端信封指示失败（业务 code != 200），携带后端 message
    #[error("{message}")]
    Backend { code: i64, message: String },

    /// 信封指示成功但缺少 data 字段
    #[error("响应缺少 data 字段")]
    MissingData,
}

/// 错误提示文案的取值顺序：后端 message > 传输层错误信息 > 兜底文案。
///
/// 对应前端 `e.response?.data?.message || e.message || '诊断失败'` 的优先级，
/// 独立成函数以便单独验证。
pub fn diagnosis_error_message(err: &ApiError) -> String {
    let msg = match err {
        ApiError::Backend { message, .. } => message.trim().to_string(),
        other => other.to_string(),
    };
    if msg.is_empty() {
        DIAGNOSIS_FAILED.to_string()
    } else {
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_takes_priority() {
        let err = ApiError::Backend {
            code: 500,
            message: "LLM服务繁忙".to_string(),
        };
        assert_eq!(diagnosis_error_message(&err), "LLM服务繁忙");
    }

    #[test]
    fn test_http_error_falls_back_to_generic_message() {
        let err = ApiError::Http { status: 502 };
        assert_eq!(diagnosis_error_message(&err), "HTTP 状态异常: 502");
    }

    #[test]
    fn test_empty_backend_message_falls_back_to_default() {
        let err = ApiError::Backend {
            code: 500,
            message: "  ".to_string(),
        };
        assert_eq!(diagnosis_error_message(&err), DIAGNOSIS_FAILED);
    }
}
