//! Storage analysis action handler.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{wrong_payload, ActionHandler};
use crate::types::{ActionKind, ActionPayload, ActionResult};

pub struct AnalyzeStorageHandler;

#[async_trait]
impl ActionHandler for AnalyzeStorageHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::AnalyzeStorage
    }

    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let ActionPayload::AnalyzeStorage(analysis) = payload else {
            return Err(wrong_payload(self.kind(), payload));
        };

        tracing::info!(
            total_files = analysis.total_files,
            largest = %analysis.largest_category,
            "Storage analysed"
        );

        Ok(ActionResult {
            success: true,
            message: "Analiz tamamlandı! Detaylı raporu görüntüleyebilirsiniz.".to_string(),
        })
    }

    fn describe(&self, _payload: &ActionPayload) -> String {
        "Analyse storage usage".to_string()
    }
}
