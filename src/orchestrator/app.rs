//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责把各组件串成一次完整的操作：
//!
//! 1. **应用初始化**：创建网关客户端、聚合会话、批量回退编排器
//! 2. **聚合阶段**：查首页，然后续传分页直到取尽
//! 3. **确认闸门**：向操作者要一次明确的 yes/no
//! 4. **回退阶段**：把累积的编辑集合交给批量回退编排器
//!
//! 聚合与回退严格先后执行，绝不并发：批次 `Running` 期间
//! 不会发起新的查询，反之亦然。

use std::io::{self, Write};

use anyhow::Result;
use tracing::{error, info};

use crate::clients::GatewayClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::orchestrator::{ContribSession, RollbackBatch};
use crate::services::ConsoleSink;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    session: ContribSession<GatewayClient>,
    batch: RollbackBatch<GatewayClient>,
    sink: ConsoleSink,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        logging::log_startup(&config);

        let gateway = GatewayClient::new(&config)?;

        Ok(Self {
            session: ContribSession::new(gateway.clone()),
            batch: RollbackBatch::new(gateway, &config),
            sink: ConsoleSink::with_verbose(config.verbose_logging),
            config,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self, username: &str) -> Result<()> {
        // 聚合阶段：首页
        self.session.start_lookup(username, &mut self.sink).await?;

        if self.session.edits().is_empty() {
            return Ok(());
        }

        // 聚合阶段：续传分页直到取尽
        while self.session.has_more() {
            info!("📄 继续加载下一页...");
            if let Err(e) = self.session.load_next_page(username, &mut self.sink).await {
                // 续传失败不丢弃已累积的编辑，由操作者重新触发
                error!("❌ 加载更多编辑失败: {}", e);
                break;
            }
        }

        info!("📋 共加载 {} 条编辑", self.session.edits().len());

        // 确认闸门
        if !self.batch.request_confirmation(&mut self.sink) {
            return Ok(());
        }
        if !self.confirm_with_operator()? {
            self.batch.decline(&mut self.sink);
            info!("已取消，未执行任何回退");
            return Ok(());
        }

        // 回退阶段
        let stats = self.batch.run(self.session.edits(), &mut self.sink).await?;
        logging::print_final_stats(stats.success, stats.failed, stats.total);

        Ok(())
    }

    /// 向操作者要一次明确确认
    fn confirm_with_operator(&self) -> Result<bool> {
        if self.config.assume_yes {
            return Ok(true);
        }

        print!("⚠️ 确认要回退以上全部编辑吗？[y/N] ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(matches!(line.trim(), "y" | "Y" | "yes"))
    }
}
