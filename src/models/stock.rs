use serde::{Deserialize, Serialize};

/// 股票基本信息 + 实时行情（来自后端 /api/stock/{code}）
///
/// 后端在实时行情获取失败时会省略行情字段，因此价格相关字段均为可选。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInfo {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub change_pct: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// 涨跌样式分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceChangeClass {
    #[serde(rename = "price-up")]
    Up,
    #[serde(rename = "price-down")]
    Down,
    #[serde(rename = "price-flat")]
    Flat,
}

impl PriceChangeClass {
    /// 涨跌幅缺失或恰好为 0 时归类为平盘
    pub fn from_change_pct(change_pct: Option<f64>) -> Self {
        match change_pct {
            Some(v) if v > 0.0 => Self::Up,
            Some(v) if v < 0.0 => Self::Down,
            _ => Self::Flat,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Up => "price-up",
            Self::Down => "price-down",
            Self::Flat => "price-flat",
        }
    }
}

/// 历史查询记录，最多保留10条，按时间倒序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub code: String,
    pub name: String,
    /// RFC 3339 时间戳
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_change_class() {
        assert_eq!(PriceChangeClass::from_change_pct(Some(2.3)), PriceChangeClass::Up);
        assert_eq!(PriceChangeClass::from_change_pct(Some(-0.01)), PriceChangeClass::Down);
        assert_eq!(PriceChangeClass::from_change_pct(Some(0.0)), PriceChangeClass::Flat);
        assert_eq!(PriceChangeClass::from_change_pct(None), PriceChangeClass::Flat);
    }

    #[test]
    fn test_stock_info_without_quote_fields() {
        // 实时行情获取失败时后端只返回基本信息
        let info: StockInfo = serde_json::from_str(
            r#"{"code":"000001","name":"平安银行","industry":"银行","market":"深市主板"}"#,
        )
        .unwrap();
        assert_eq!(info.name, "平安银行");
        assert!(info.current_price.is_none());
        assert_eq!(PriceChangeClass::from_change_pct(info.change_pct), PriceChangeClass::Flat);
    }
}
