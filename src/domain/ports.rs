use crate::domain::model::FetchOutcome;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 取得遠端純文字內容。實作不得回傳錯誤，失敗要記錄在 `FetchOutcome` 裡。
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, location: &str) -> FetchOutcome;
}
