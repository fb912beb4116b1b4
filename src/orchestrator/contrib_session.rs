//! 贡献聚合会话 - 编排层
//!
//! ## 职责
//!
//! 把一个用户名变成一个不断增长的编辑集合：
//!
//! 1. **发起查询**：校验用户名、重置状态、取第一页
//! 2. **续传分页**：带上按站点的游标表继续取，按页追加合并
//! 3. **状态持有**：编辑集合与游标表只归本会话所有，
//!    回退编排只读集合，绝不修改
//!
//! 每次取页只尝试一次，不重试。续传失败不破坏已累积的编辑。

use tracing::info;

use crate::clients::ContribGateway;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{ContinuationMap, Edit};
use crate::services::StatusSink;

/// 贡献聚合会话
pub struct ContribSession<G: ContribGateway> {
    gateway: G,
    edits: Vec<Edit>,
    continuation: ContinuationMap,
}

impl<G: ContribGateway> ContribSession<G> {
    /// 创建新的聚合会话
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            edits: Vec::new(),
            continuation: ContinuationMap::new(),
        }
    }

    /// 开始一次新的用户名查询
    ///
    /// 先清空上一次查询的全部状态，再取第一页。
    /// 用户名去除首尾空白后为空时直接报校验错误，不发请求。
    /// 首页请求失败时状态保持为空。
    pub async fn start_lookup(
        &mut self,
        username: &str,
        sink: &mut dyn StatusSink,
    ) -> AppResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation(ValidationError::EmptyUsername));
        }

        self.edits.clear();
        self.continuation.clear();

        info!("🔍 正在查询用户 {} 的全局贡献...", username);

        let page = self.gateway.fetch_contribs(username, None).await?;

        if page.edits.is_empty() {
            sink.show_no_edits();
        }
        for edit in &page.edits {
            sink.append_row(edit);
        }

        self.edits = page.edits;
        self.continuation = page.next_uccontinue_map;
        sink.set_load_more_visible(self.has_more());

        info!("✓ 首页加载完成，共 {} 条编辑", self.edits.len());
        Ok(())
    }

    /// 继续加载下一页
    ///
    /// 把当前游标表序列化进请求（表为空也照常发出，返回什么就合并什么）。
    /// 成功时按顺序追加本页编辑并替换游标表；失败时已有状态原封不动。
    pub async fn load_next_page(
        &mut self,
        username: &str,
        sink: &mut dyn StatusSink,
    ) -> AppResult<()> {
        let page = self
            .gateway
            .fetch_contribs(username, Some(&self.continuation))
            .await?;

        for edit in &page.edits {
            sink.append_row(edit);
        }

        self.edits.extend(page.edits);
        self.continuation = page.next_uccontinue_map;
        sink.set_load_more_visible(self.has_more());

        info!("✓ 已累积 {} 条编辑", self.edits.len());
        Ok(())
    }

    /// 是否还有更多页（最近一次成功响应的游标表非空）
    pub fn has_more(&self) -> bool {
        !self.continuation.is_empty()
    }

    /// 当前累积的编辑集合（追加有序，不去重）
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// 当前的续传游标表
    pub fn continuation(&self) -> &ContinuationMap {
        &self.continuation
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::ContribPage;
    use crate::services::{CollectSink, SinkEvent};

    /// 记录调用并按脚本出结果的假网关
    struct FakeContribGateway {
        pages: Mutex<Vec<AppResult<ContribPage>>>,
        calls: Arc<Mutex<Vec<(String, Option<ContinuationMap>)>>>,
    }

    impl FakeContribGateway {
        fn new(pages: Vec<AppResult<ContribPage>>) -> (Self, Arc<Mutex<Vec<(String, Option<ContinuationMap>)>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    pages: Mutex::new(pages),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait::async_trait]
    impl ContribGateway for FakeContribGateway {
        async fn fetch_contribs(
            &self,
            username: &str,
            continuation: Option<&ContinuationMap>,
        ) -> AppResult<ContribPage> {
            self.calls
                .lock()
                .unwrap()
                .push((username.to_string(), continuation.cloned()));
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok(ContribPage::default());
            }
            pages.remove(0)
        }
    }

    fn edit(wiki: &str, revid: u64) -> Edit {
        Edit {
            revid,
            wiki: wiki.to_string(),
            title: format!("Page {}", revid),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            comment: None,
            sizediff: 1,
            user: Some("Bob".to_string()),
            wiki_api: None,
        }
    }

    fn page(edits: Vec<Edit>, cont: &[(&str, &str)]) -> ContribPage {
        ContribPage {
            edits,
            next_uccontinue_map: cont
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn empty_username_is_rejected_without_request() {
        let (gateway, calls) = FakeContribGateway::new(vec![]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        let err = session.start_lookup("   ", &mut sink).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::EmptyUsername)));
        assert!(calls.lock().unwrap().is_empty());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn first_page_replaces_state() {
        let (gateway, calls) = FakeContribGateway::new(vec![Ok(page(
            vec![edit("enwiki", 1), edit("dewiki", 2)],
            &[("enwiki", "c1")],
        ))]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        session.start_lookup("  Bob  ", &mut sink).await.unwrap();

        assert_eq!(session.edits().len(), 2);
        assert!(session.has_more());
        // 用户名去除了首尾空白，首页不带续传
        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].0, "Bob");
        assert!(calls[0].1.is_none());
        // 两行 + "加载更多"可见
        assert_eq!(
            sink.events(),
            &[
                SinkEvent::Row { wiki: "enwiki".to_string(), revid: 1 },
                SinkEvent::Row { wiki: "dewiki".to_string(), revid: 2 },
                SinkEvent::LoadMoreVisible(true),
            ]
        );
    }

    #[tokio::test]
    async fn empty_first_page_shows_no_edits() {
        let (gateway, _calls) = FakeContribGateway::new(vec![Ok(page(vec![], &[]))]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        session.start_lookup("Alice", &mut sink).await.unwrap();

        assert!(session.edits().is_empty());
        assert!(!session.has_more());
        assert_eq!(
            sink.events(),
            &[SinkEvent::NoEdits, SinkEvent::LoadMoreVisible(false)]
        );
    }

    #[tokio::test]
    async fn pages_append_in_order() {
        let (gateway, calls) = FakeContribGateway::new(vec![
            Ok(page(vec![edit("enwiki", 1)], &[("enwiki", "c1")])),
            Ok(page(vec![edit("enwiki", 2), edit("frwiki", 3)], &[("frwiki", "c2")])),
            Ok(page(vec![edit("dewiki", 4)], &[])),
        ]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        session.start_lookup("Bob", &mut sink).await.unwrap();
        session.load_next_page("Bob", &mut sink).await.unwrap();
        session.load_next_page("Bob", &mut sink).await.unwrap();

        // 长度 = 各页之和，顺序 = 页序
        let revids: Vec<u64> = session.edits().iter().map(|e| e.revid).collect();
        assert_eq!(revids, vec![1, 2, 3, 4]);
        // 取尽后不再有更多页
        assert!(!session.has_more());

        // 续传请求带上了上一页的游标表
        let calls = calls.lock().unwrap();
        assert_eq!(
            calls[1].1.as_ref().unwrap().get("enwiki").map(String::as_str),
            Some("c1")
        );
        assert_eq!(
            calls[2].1.as_ref().unwrap().get("frwiki").map(String::as_str),
            Some("c2")
        );
    }

    #[tokio::test]
    async fn continuation_failure_preserves_state() {
        let (gateway, _calls) = FakeContribGateway::new(vec![
            Ok(page(vec![edit("enwiki", 1)], &[("enwiki", "c1")])),
            Err(AppError::empty_response("/get_global_contribs")),
        ]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        session.start_lookup("Bob", &mut sink).await.unwrap();
        let err = session.load_next_page("Bob", &mut sink).await;

        assert!(err.is_err());
        // 已累积的编辑和游标表原封不动
        assert_eq!(session.edits().len(), 1);
        assert!(session.has_more());
        assert_eq!(session.continuation().get("enwiki").map(String::as_str), Some("c1"));
    }

    #[tokio::test]
    async fn first_page_failure_leaves_empty_state() {
        let (gateway, _calls) = FakeContribGateway::new(vec![
            Err(AppError::empty_response("/get_global_contribs")),
        ]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        let err = session.start_lookup("Bob", &mut sink).await;

        assert!(err.is_err());
        assert!(session.edits().is_empty());
        assert!(!session.has_more());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn new_lookup_resets_previous_state() {
        let (gateway, _calls) = FakeContribGateway::new(vec![
            Ok(page(vec![edit("enwiki", 1), edit("enwiki", 2)], &[("enwiki", "c1")])),
            Ok(page(vec![edit("frwiki", 9)], &[])),
        ]);
        let mut session = ContribSession::new(gateway);
        let mut sink = CollectSink::new();

        session.start_lookup("Bob", &mut sink).await.unwrap();
        session.start_lookup("Carol", &mut sink).await.unwrap();

        let revids: Vec<u64> = session.edits().iter().map(|e| e.revid).collect();
        assert_eq!(revids, vec![9]);
        assert!(!session.has_more());
    }
}
