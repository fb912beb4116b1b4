//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责状态持有和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `contrib_session` - 贡献聚合会话
//! - 持有编辑集合（Vec<Edit>）和按站点的续传游标表
//! - 首页查询 / 续传分页，按页追加合并
//! - 暴露"是否还有更多页"
//!
//! ### `batch_rollback` - 批量回退编排器
//! - 确认闸门（状态机 Idle → Confirming → Running → Complete）
//! - 严格串行、固定节流地逐条回退
//! - 单条失败隔离，汇总批次统计
//!
//! ### `app` - 应用编排
//! - 串起"查询 → 分页 → 确认 → 回退"的完整一次操作
//! - 保证聚合与回退绝不并发
//!
//! ## 层次关系
//!
//! ```text
//! app (一次完整操作)
//!     ↓
//! contrib_session / batch_rollback (集合与批次)
//!     ↓
//! workflow::RollbackFlow (处理单条 Edit)
//!     ↓
//! services (能力层：wiki_domain / status_sink)
//!     ↓
//! clients (基础设施：GatewayClient)
//! ```

pub mod app;
pub mod batch_rollback;
pub mod contrib_session;

// 重新导出主要类型
pub use app::App;
pub use batch_rollback::{BatchState, BatchStats, RollbackBatch};
pub use contrib_session::ContribSession;
