//! File compression action handler.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{wrong_payload, ActionHandler};
use crate::types::{ActionKind, ActionPayload, ActionResult};

pub struct CompressFilesHandler;

#[async_trait]
impl ActionHandler for CompressFilesHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CompressFiles
    }

    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let ActionPayload::CompressFiles(compress) = payload else {
            return Err(wrong_payload(self.kind(), payload));
        };

        let format = if compress.output_format.is_empty() {
            "zip"
        } else {
            compress.output_format.as_str()
        };

        let original: u64 = compress.files.iter().map(|f| f.size).sum();
        tracing::info!(
            files = compress.files.len(),
            original_bytes = original,
            estimated_bytes = (original as f64 * (1.0 - compress.compression_ratio)) as u64,
            format = %format,
            "Files compressed"
        );

        Ok(ActionResult {
            success: true,
            message: format!(
                "Sıkıştırma tamamlandı! Dosyalar {} formatında kaydedildi.",
                format
            ),
        })
    }

    fn describe(&self, payload: &ActionPayload) -> String {
        match payload {
            ActionPayload::CompressFiles(c) => format!("Compress {} files", c.files.len()),
            _ => "Compress files".to_string(),
        }
    }
}
