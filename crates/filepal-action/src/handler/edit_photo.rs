//! Photo edit action handler.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{wrong_payload, ActionHandler};
use crate::types::{ActionKind, ActionPayload, ActionResult};

/// Label used when the user never picked a filter.
const DEFAULT_FILTER_LABEL: &str = "Seçilen filtre";

pub struct EditPhotoHandler;

#[async_trait]
impl ActionHandler for EditPhotoHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::EditPhoto
    }

    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let ActionPayload::EditPhoto(edit) = payload else {
            return Err(wrong_payload(self.kind(), payload));
        };

        let filter = edit
            .applied_filter
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILTER_LABEL);

        tracing::info!(image = %edit.image.name, filter = %filter, "Photo edited");

        Ok(ActionResult {
            success: true,
            message: format!("Fotoğraf düzenlendi! {} uygulandı.", filter),
        })
    }

    fn describe(&self, payload: &ActionPayload) -> String {
        match payload {
            ActionPayload::EditPhoto(e) => format!("Edit photo {}", e.image.name),
            _ => "Edit photo".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EditPhotoPayload;
    use chrono::Utc;
    use filepal_core::types::{FileRecord, FileType};

    fn payload(filter: Option<&str>) -> ActionPayload {
        let image = FileRecord::new("1", "beach.jpg", FileType::Image, 1, Utc::now(), "/DCIM");
        let mut edit = EditPhotoPayload::for_image(image);
        edit.applied_filter = filter.map(str::to_string);
        ActionPayload::EditPhoto(edit)
    }

    #[tokio::test]
    async fn test_edit_without_filter_uses_default_label() {
        let result = EditPhotoHandler.execute(&payload(None)).await.unwrap();
        assert_eq!(result.message, "Fotoğraf düzenlendi! Seçilen filtre uygulandı.");
    }

    #[tokio::test]
    async fn test_edit_with_filter() {
        let result = EditPhotoHandler.execute(&payload(Some("vintage"))).await.unwrap();
        assert_eq!(result.message, "Fotoğraf düzenlendi! vintage uygulandı.");
    }

    #[test]
    fn test_edit_describe() {
        assert_eq!(EditPhotoHandler.describe(&payload(None)), "Edit photo beach.jpg");
    }
}
