//! Junk cleaner action handler.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{wrong_payload, ActionHandler};
use crate::types::{ActionKind, ActionPayload, ActionResult};

pub struct JunkCleanerHandler;

#[async_trait]
impl ActionHandler for JunkCleanerHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::JunkCleaner
    }

    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let ActionPayload::JunkCleaner(junk) = payload else {
            return Err(wrong_payload(self.kind(), payload));
        };

        if junk.potential_space_gb < 0.0 {
            return Err(ActionError::InvalidPayload(
                "Reclaimable space must not be negative".to_string(),
            ));
        }

        tracing::info!(
            freed_gb = junk.potential_space_gb,
            cache_gb = junk.breakdown.cache,
            temp_gb = junk.breakdown.temp,
            duplicates_gb = junk.breakdown.duplicates,
            "Junk cleaned"
        );

        Ok(ActionResult {
            success: true,
            message: format!(
                "Temizlik tamamlandı! {} GB alan boşaltıldı.",
                junk.potential_space_gb
            ),
        })
    }

    fn describe(&self, payload: &ActionPayload) -> String {
        match payload {
            ActionPayload::JunkCleaner(j) => format!("Clean {} GB of junk", j.potential_space_gb),
            _ => "Clean junk".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JunkCleanerPayload;

    #[tokio::test]
    async fn test_junk_completion_text() {
        let payload = ActionPayload::JunkCleaner(JunkCleanerPayload::default());
        let result = JunkCleanerHandler.execute(&payload).await.unwrap();
        assert_eq!(result.message, "Temizlik tamamlandı! 1.2 GB alan boşaltıldı.");
    }

    #[tokio::test]
    async fn test_junk_zero_space() {
        let mut junk = JunkCleanerPayload::default();
        junk.potential_space_gb = 0.0;
        let result = JunkCleanerHandler
            .execute(&ActionPayload::JunkCleaner(junk))
            .await
            .unwrap();
        assert_eq!(result.message, "Temizlik tamamlandı! 0 GB alan boşaltıldı.");
    }

    #[tokio::test]
    async fn test_junk_negative_space_rejected() {
        let mut junk = JunkCleanerPayload::default();
        junk.potential_space_gb = -1.0;
        let err = JunkCleanerHandler
            .execute(&ActionPayload::JunkCleaner(junk))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidPayload(_)));
    }
}
