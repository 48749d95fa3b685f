use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;

use crate::db::database::Database;
use crate::error::{diagnosis_error_message, ApiError};
use crate::models::analysis::DiagnosisData;
use crate::models::stock::{HistoryEntry, PriceChangeClass, StockInfo};
use crate::services::api_client::DiagnoseApi;

/// 历史查询记录保留条数
const MAX_HISTORY: usize = 10;

/// 界面状态容器：当前诊断结果、加载/错误标记、用户偏好与查询历史。
///
/// 偏好与历史写穿到本地库，构造时读回一次。
/// 诊断走 `DiagnoseApi`，其余字段的修改都是同步方法。
/// `diagnose` 持有 `&mut self`，同一个 store 上不会出现并发诊断。
pub struct StockStore {
    api: Arc<dyn DiagnoseApi>,
    db: Database,
    current_stock: Option<StockInfo>,
    analysis_result: Option<Value>,
    loading: bool,
    error: Option<String>,
    user_preference: String,
    search_history: Vec<HistoryEntry>,
}

impl StockStore {
    pub fn new(api: Arc<dyn DiagnoseApi>, db: Database) -> Result<Self> {
        let user_preference = db.load_user_preference()?;
        let search_history = db.load_search_history()?;
        Ok(Self {
            api,
            db,
            current_stock: None,
            analysis_result: None,
            loading: false,
            error: None,
            user_preference,
            search_history,
        })
    }

    pub fn current_stock(&self) -> Option<&StockInfo> {
        self.current_stock.as_ref()
    }

    pub fn analysis_result(&self) -> Option<&Value> {
        self.analysis_result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user_preference(&self) -> &str {
        &self.user_preference
    }

    pub fn search_history(&self) -> &[HistoryEntry] {
        &self.search_history
    }

    pub fn has_result(&self) -> bool {
        self.analysis_result.is_some()
    }

    /// 当前股票的涨跌样式，未选中股票或涨跌幅缺失/为零时为平盘
    pub fn price_change_class(&self) -> PriceChangeClass {
        PriceChangeClass::from_change_pct(self.current_stock.as_ref().and_then(|s| s.change_pct))
    }

    /// 个股诊断。
    ///
    /// 成功时用同一响应原子地更新 current_stock 与 analysis_result，
    /// 并把该股票记入查询历史；失败时把最具体的错误文案写入 error 并上抛。
    /// 无论哪条路径退出，loading 都会复位。
    pub async fn diagnose(
        &mut self,
        code: &str,
        force_refresh: bool,
    ) -> Result<DiagnosisData, ApiError> {
        self.loading = true;
        self.error = None;

        let result = self.run_diagnose(code, force_refresh).await;
        self.loading = false;

        match result {
            Ok(data) => Ok(data),
            Err(e) => {
                self.error = Some(diagnosis_error_message(&e));
                Err(e)
            }
        }
    }

    async fn run_diagnose(
        &mut self,
        code: &str,
        force_refresh: bool,
    ) -> Result<DiagnosisData, ApiError> {
        let envelope = self
            .api
            .diagnose(code, &self.user_preference, force_refresh)
            .await?;

        if !envelope.is_success() {
            return Err(ApiError::Backend {
                code: envelope.code,
                message: envelope.message,
            });
        }
        let data = envelope.data.ok_or(ApiError::MissingData)?;

        self.current_stock = Some(data.stock_info.clone());
        self.analysis_result = Some(data.analysis.clone());
        self.add_to_history(code, &data.stock_info.name);

        Ok(data)
    }

    /// 查询历史：去重后插到队首，超过上限从队尾截断，随后写穿到本地库
    fn add_to_history(&mut self, code: &str, name: &str) {
        self.search_history.retain(|item| item.code != code);
        self.search_history.insert(
            0,
            HistoryEntry {
                code: code.to_string(),
                name: name.to_string(),
                time: Utc::now().to_rfc3339(),
            },
        );
        self.search_history.truncate(MAX_HISTORY);

        if let Err(e) = self.db.save_search_history(&self.search_history) {
            log::warn!("保存查询历史失败: {}", e);
        }
    }

    /// 清空当前结果与错误，不触发后端调用
    pub fn clear_result(&mut self) {
        self.current_stock = None;
        self.analysis_result = None;
        self.error = None;
    }

    /// 更新用户投资偏好并立即持久化
    pub fn set_user_preference(&mut self, preference: &str) {
        self.user_preference = preference.to_string();
        if let Err(e) = self.db.save_user_preference(&self.user_preference) {
            log::warn!("保存用户偏好失败: {}", e);
        }
    }
}
