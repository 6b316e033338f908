//! Backup action handler.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{wrong_payload, ActionHandler};
use crate::types::{ActionKind, ActionPayload, ActionResult};

pub struct BackupFilesHandler;

#[async_trait]
impl ActionHandler for BackupFilesHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::BackupFiles
    }

    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let ActionPayload::BackupFiles(backup) = payload else {
            return Err(wrong_payload(self.kind(), payload));
        };

        tracing::info!(
            total_files = backup.total_files,
            size_gb = backup.total_size_gb,
            destination = %backup.destination,
            "Backup finished"
        );

        Ok(ActionResult {
            success: true,
            message: "Yedekleme tamamlandı! Tüm dosyalarınız güvende.".to_string(),
        })
    }

    fn describe(&self, payload: &ActionPayload) -> String {
        match payload {
            ActionPayload::BackupFiles(b) => {
                format!("Back up {} files to {}", b.total_files, b.destination)
            }
            _ => "Back up files".to_string(),
        }
    }
}
