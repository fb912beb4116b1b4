//! 数据模型 - 编辑记录、分页续传与回退结果
//!
//! 与网关的两个接口（`/get_global_contribs`、`/rollback_all`）
//! 的线上格式一一对应，反序列化时忽略未知字段。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 按站点的续传游标表
///
/// 键是站点标识（如 `enwiki`），值是该站点的续传游标。
/// 空表（或响应中缺失）表示所有站点都已取尽。
pub type ContinuationMap = HashMap<String, String>;

/// 单条编辑记录
///
/// 由网关返回后不再修改。`revid` 只在单个站点内唯一，
/// 跨站点定位一条编辑必须用 `(wiki, revid)` 组合。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edit {
    /// 版本号（站点内唯一）
    pub revid: u64,
    /// 站点标识（数据库名风格，如 `enwiki`）
    pub wiki: String,
    /// 页面标题
    pub title: String,
    /// 编辑时间（ISO 8601 字符串，原样保留）
    pub timestamp: String,
    /// 编辑摘要
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// 字节增减（有符号）
    #[serde(default)]
    pub sizediff: i64,
    /// 编辑者用户名（回退请求需要原样回传给网关）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// 所属站点的 API 地址（网关执行回退时使用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_api: Option<String>,
}

/// 一页贡献查询结果
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContribPage {
    /// 本页的编辑列表（可能为空）
    #[serde(default)]
    pub edits: Vec<Edit>,
    /// 下一页的续传游标表（空表示取尽）
    #[serde(default)]
    pub next_uccontinue_map: ContinuationMap,
}

/// 回退接口的完整响应
#[derive(Debug, Clone, Deserialize)]
pub struct RollbackResponse {
    #[serde(default)]
    pub success: bool,
    /// 整体失败时的说明（如未登录）
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<RollbackOutcome>,
}

/// 单条回退的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackOutcome {
    pub revid: u64,
    pub wiki: String,
    pub title: String,
    /// `"success"` 或失败代码
    pub status: String,
    /// 失败详情（网关可能返回字符串或对象）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl RollbackOutcome {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
