//! 单条回退流程 - 流程层
//!
//! 核心职责：定义"一条编辑"的完整回退流程
//!
//! 流程顺序：发出回退请求 → 解析单条结果 → 写入状态汇
//!
//! 不持有编辑集合，不关心批次顺序和节流，这些由编排层负责。
//! 单独调用本流程就是"单条模式"（比如对某一行的手动重试）。

use tracing::{info, warn};

use crate::clients::RollbackGateway;
use crate::error::AppResult;
use crate::models::{Edit, RollbackOutcome};
use crate::services::StatusSink;

/// 单条回退流程
pub struct RollbackFlow<G: RollbackGateway> {
    gateway: G,
}

impl<G: RollbackGateway> RollbackFlow<G> {
    /// 创建新的回退流程
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// 回退一条编辑，并把结果写入状态汇
    ///
    /// 每条编辑只尝试一次。请求失败时返回 Err，状态汇保持不动，
    /// 由调用方决定是否继续后面的编辑。
    pub async fn rollback_one(
        &self,
        edit: &Edit,
        sink: &mut dyn StatusSink,
    ) -> AppResult<RollbackOutcome> {
        info!("📤 正在回退 {} 上的编辑 {} ({})...", edit.wiki, edit.revid, edit.title);

        let outcome = self.gateway.rollback(edit).await?;

        if outcome.is_success() {
            info!("✓ 回退成功: {} / {}", outcome.wiki, outcome.revid);
        } else {
            warn!(
                "⚠️ 回退未成功: {} / {} (状态: {}, 详情: {:?})",
                outcome.wiki, outcome.revid, outcome.status, outcome.error
            );
        }

        // 状态按 (站点, 版本号) 定位，行不存在时由状态汇静默丢弃
        sink.set_status(&outcome.wiki, outcome.revid, &outcome.status);

        Ok(outcome)
    }
}
