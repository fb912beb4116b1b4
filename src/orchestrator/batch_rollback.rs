//! 批量回退编排 - 编排层
//!
//! ## 职责
//!
//! 1. **确认闸门**：批次必须经过一轮确认才能执行（破坏性操作）
//! 2. **严格串行**：按集合顺序逐条回退，上一条出结果前绝不发下一条
//! 3. **固定节流**：每条之后固定等待一段时间，只为限制请求频率，
//!    不是自适应退避
//! 4. **失败隔离**：单条失败只记录日志，继续下一条，绝不中断批次
//! 5. **终态**：批次结束进入 `Complete`，不自动复位，
//!    重新执行需要新一轮确认
//!
//! 批次一旦开始没有取消机制，会一直跑到最后一条（沿用既有设计的限制）。

use std::time::Duration;

use tracing::{error, info, warn};

use crate::clients::RollbackGateway;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::Edit;
use crate::services::StatusSink;
use crate::workflow::RollbackFlow;

/// 批次状态机
///
/// `Idle → Confirming → Running → Complete`；
/// 确认被拒绝时回到 `Idle`；`Complete` 是终态，
/// 只有新一轮确认能再次进入 `Running`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// 空闲，可发起确认
    Idle,
    /// 等待操作者确认
    Confirming,
    /// 正在逐条执行
    Running,
    /// 批次完成（终态）
    Complete,
}

/// 批次统计
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 批量回退编排器
///
/// 只读编辑集合，从不修改它。
pub struct RollbackBatch<G: RollbackGateway> {
    flow: RollbackFlow<G>,
    delay: Duration,
    state: BatchState,
}

impl<G: RollbackGateway> RollbackBatch<G> {
    /// 创建新的批量回退编排器
    pub fn new(gateway: G, config: &Config) -> Self {
        Self {
            flow: RollbackFlow::new(gateway),
            delay: Duration::from_millis(config.rollback_delay_ms),
            state: BatchState::Idle,
        }
    }

    /// 当前批次状态
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// 进入确认阶段
    ///
    /// 只能从 `Idle` 或 `Complete`（发起新一轮）进入；
    /// `Running` 中拒绝重入。返回是否成功进入。
    pub fn request_confirmation(&mut self, sink: &mut dyn StatusSink) -> bool {
        match self.state {
            BatchState::Idle | BatchState::Complete => {
                self.state = BatchState::Confirming;
                sink.set_batch_state(self.state);
                true
            }
            _ => {
                warn!("⚠️ 批次正在进行，拒绝重复发起 (当前状态: {:?})", self.state);
                false
            }
        }
    }

    /// 操作者拒绝确认，回到空闲
    pub fn decline(&mut self, sink: &mut dyn StatusSink) {
        if self.state == BatchState::Confirming {
            self.state = BatchState::Idle;
            sink.set_batch_state(self.state);
        }
    }

    /// 执行批量回退
    ///
    /// 前置条件：已通过确认（`Confirming`），否则拒绝执行。
    /// 空集合是 no-op，直接回到 `Idle`。
    /// 每条编辑只尝试一次；单条失败不影响后续。
    pub async fn run(
        &mut self,
        edits: &[Edit],
        sink: &mut dyn StatusSink,
    ) -> AppResult<BatchStats> {
        if self.state != BatchState::Confirming {
            warn!("⚠️ 批次未经确认，拒绝执行 (当前状态: {:?})", self.state);
            return Ok(BatchStats::default());
        }

        if edits.is_empty() {
            self.state = BatchState::Idle;
            sink.set_batch_state(self.state);
            return Ok(BatchStats::default());
        }

        self.state = BatchState::Running;
        sink.set_batch_state(self.state);

        let total = edits.len();
        let mut stats = BatchStats {
            total,
            ..Default::default()
        };

        info!("🚀 开始批量回退，共 {} 条，间隔 {:?}", total, self.delay);

        for (index, edit) in edits.iter().enumerate() {
            info!("[回退 {}/{}] {} @ {}", index + 1, total, edit.title, edit.wiki);

            // 严格串行：等本条出结果再发下一条
            match self.flow.rollback_one(edit, sink).await {
                Ok(outcome) if outcome.is_success() => stats.success += 1,
                Ok(_) => stats.failed += 1,
                Err(e) => {
                    // 单条失败只记录，继续下一条
                    error!("[回退 {}/{}] ❌ 请求失败: {}", index + 1, total, e);
                    stats.failed += 1;
                }
            }

            // 固定节流，成功失败一视同仁
            tokio::time::sleep(self.delay).await;
        }

        self.state = BatchState::Complete;
        sink.set_batch_state(self.state);
        info!("✅ 批量回退完成: 成功 {}/{}", stats.success, stats.total);

        Ok(stats)
    }
}
