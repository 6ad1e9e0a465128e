use crate::domain::content::ContentRepository;
use crate::domain::model::{ExtractResult, TransformResult};
use crate::domain::tables::{ColorTable, SplitTable};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dashboard_title(&self) -> &str;
    fn data_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// Periods to render; empty means every configured period.
    fn selected_periods(&self) -> &[String];
    fn content(&self) -> &ContentRepository;
    fn splits(&self) -> &SplitTable;
    fn colors(&self) -> &ColorTable;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractResult>;
    async fn transform(&self, data: ExtractResult) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
