//! # Global Mass Rollback
//!
//! 一个跨维基批量回退编辑的客户端编排器
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 连接，只暴露网关能力
//! - `GatewayClient` - 唯一发网络请求的模块，
//!   实现贡献查询（`ContribGateway`）和回退执行（`RollbackGateway`）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不持有集合状态
//! - `wiki_domain` - 站点标识 → 公开域名 / 链接（纯函数）
//! - `StatusSink` - 注入式状态汇接口（控制台实现 + 测试用内存实现）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条编辑"的完整回退流程
//! - `RollbackFlow` - 单条回退（请求 → 结果 → 状态汇）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/contrib_session` - 贡献聚合会话，持有集合与续传游标
//! - `orchestrator/batch_rollback` - 批量回退编排器，串行 + 节流 + 失败隔离
//! - `orchestrator/app` - 把一次完整操作串起来
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ContribGateway, GatewayClient, RollbackGateway};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ContinuationMap, ContribPage, Edit, RollbackOutcome};
pub use orchestrator::{App, BatchState, BatchStats, ContribSession, RollbackBatch};
pub use services::{ConsoleSink, StatusSink};
pub use workflow::RollbackFlow;
