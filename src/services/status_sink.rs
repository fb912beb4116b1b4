//! 状态汇报接口 - 业务能力层
//!
//! 核心逻辑不依赖任何具体的展示技术，只面向这个注入的"状态汇"接口：
//! 追加一行编辑、标记无结果、控制"加载更多"的可见性、
//! 更新单条回退状态、更新批次状态。
//!
//! 回退状态按 `(wiki, revid)` 定位行：revid 只在站点内唯一，
//! 单独用 revid 会在跨站点撞号时把状态写错行。

use std::collections::HashSet;

use tracing::{info, warn};

use crate::models::Edit;
use crate::orchestrator::BatchState;
use crate::services::wiki_domain::{diff_url, hist_url};
use crate::utils::logging::truncate_text;

/// 状态汇接口
pub trait StatusSink: Send {
    /// 追加一行编辑
    fn append_row(&mut self, edit: &Edit);

    /// 标记"没有找到任何编辑"
    fn show_no_edits(&mut self);

    /// 显示 / 隐藏"加载更多"入口
    fn set_load_more_visible(&mut self, visible: bool);

    /// 更新某条编辑的回退状态
    ///
    /// 对应的行不存在时静默丢弃，不是错误。
    fn set_status(&mut self, wiki: &str, revid: u64, status: &str);

    /// 更新批次状态（用于"回退全部"入口的文案 / 可用性）
    fn set_batch_state(&mut self, state: BatchState);
}

/// 控制台状态汇
///
/// 把每一行编辑和状态变化打成日志，差异页 / 历史页链接
/// 由域名解析器拼出。
pub struct ConsoleSink {
    known_rows: HashSet<(String, u64)>,
    row_count: usize,
    status_updates: usize,
    verbose: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_verbose(false)
    }

    /// `verbose` 为真时额外打印每行的差异页 / 历史页链接
    pub fn with_verbose(verbose: bool) -> Self {
        Self {
            known_rows: HashSet::new(),
            row_count: 0,
            status_updates: 0,
            verbose,
        }
    }

    /// 已成功写入的状态更新条数
    pub fn status_update_count(&self) -> usize {
        self.status_updates
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for ConsoleSink {
    fn append_row(&mut self, edit: &Edit) {
        self.row_count += 1;
        self.known_rows.insert((edit.wiki.clone(), edit.revid));

        let comment = edit.comment.as_deref().unwrap_or("");
        info!(
            "[编辑 {}] {} | {} | {} | {:+} | {}",
            self.row_count,
            edit.timestamp,
            edit.wiki,
            edit.title,
            edit.sizediff,
            truncate_text(comment, 60)
        );
        if self.verbose {
            info!("[编辑 {}]   差异: {}", self.row_count, diff_url(&edit.wiki, edit.revid));
            info!("[编辑 {}]   历史: {}", self.row_count, hist_url(&edit.wiki, &edit.title));
        }
    }

    fn show_no_edits(&mut self) {
        warn!("⚠️ 未找到任何可回退的编辑");
    }

    fn set_load_more_visible(&mut self, visible: bool) {
        if visible {
            info!("💡 还有更多编辑可以加载");
        }
    }

    fn set_status(&mut self, wiki: &str, revid: u64, status: &str) {
        // 行不存在时静默丢弃
        if !self.known_rows.contains(&(wiki.to_string(), revid)) {
            return;
        }
        self.status_updates += 1;
        if status == "success" {
            info!("✅ [{} / {}] 回退成功", wiki, revid);
        } else {
            warn!("❌ [{} / {}] 回退状态: {}", wiki, revid, status);
        }
    }

    fn set_batch_state(&mut self, state: BatchState) {
        match state {
            BatchState::Idle => {}
            BatchState::Confirming => info!("⏳ 等待确认批量回退..."),
            BatchState::Running => info!("🚀 批量回退进行中..."),
            BatchState::Complete => info!("🏁 批量回退已完成"),
        }
    }
}

/// 内存状态汇（供测试使用）
///
/// 按发生顺序记录收到的全部事件。
pub struct CollectSink {
    events: Vec<SinkEvent>,
}

/// 状态汇收到的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Row { wiki: String, revid: u64 },
    NoEdits,
    LoadMoreVisible(bool),
    Status {
        wiki: String,
        revid: u64,
        status: String,
    },
    Batch(BatchState),
}

impl CollectSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// 只取状态更新事件，按发生顺序
    pub fn statuses(&self) -> Vec<(String, u64, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Status { wiki, revid, status } => {
                    Some((wiki.clone(), *revid, status.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

impl Default for CollectSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for CollectSink {
    fn append_row(&mut self, edit: &Edit) {
        self.events.push(SinkEvent::Row {
            wiki: edit.wiki.clone(),
            revid: edit.revid,
        });
    }

    fn show_no_edits(&mut self) {
        self.events.push(SinkEvent::NoEdits);
    }

    fn set_load_more_visible(&mut self, visible: bool) {
        self.events.push(SinkEvent::LoadMoreVisible(visible));
    }

    fn set_status(&mut self, wiki: &str, revid: u64, status: &str) {
        self.events.push(SinkEvent::Status {
            wiki: wiki.to_string(),
            revid,
            status: status.to_string(),
        });
    }

    fn set_batch_state(&mut self, state: BatchState) {
        self.events.push(SinkEvent::Batch(state));
    }
}
