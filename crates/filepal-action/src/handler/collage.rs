//! Collage action handler.
//!
//! Pretends to stitch the selected images into a single collage.

use async_trait::async_trait;

use crate::error::ActionError;
use crate::handler::{wrong_payload, ActionHandler};
use crate::types::{ActionKind, ActionPayload, ActionResult};

pub struct CollageHandler;

#[async_trait]
impl ActionHandler for CollageHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CreateCollage
    }

    async fn execute(&self, payload: &ActionPayload) -> Result<ActionResult, ActionError> {
        let ActionPayload::CreateCollage(collage) = payload else {
            return Err(wrong_payload(self.kind(), payload));
        };

        let title = if collage.title.is_empty() {
            "kolaj"
        } else {
            collage.title.as_str()
        };

        tracing::info!(images = collage.images.len(), title = %title, "Collage created");

        Ok(ActionResult {
            success: true,
            message: format!(
                "Kolaj oluşturuldu! {} fotoğraftan oluşan {} hazır.",
                collage.images.len(),
                title
            ),
        })
    }

    fn describe(&self, payload: &ActionPayload) -> String {
        match payload {
            ActionPayload::CreateCollage(c) => {
                format!("Create {:?} collage from {} images", c.layout, c.images.len())
            }
            _ => "Create collage".to_string(),
        }
    }
}
