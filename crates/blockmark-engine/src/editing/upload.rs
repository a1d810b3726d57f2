//! Image upload flow around an external asset store.
//!
//! Files are checked locally before the collaborator is called, so an
//! unsupported or oversized file never costs a network round-trip. The
//! reducer only ever sees the successful result as `InsertImageBlock`;
//! failures are reported to the caller and the upload modal stays open.

use crate::editing::{Action, EditorState, Patch};

/// 5 MiB
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Use JPEG, PNG, GIF or WebP.")]
    UnsupportedType(String),
    #[error("File is too large ({size} bytes). The limit is {max} bytes.")]
    TooLarge { size: u64, max: u64 },
    #[error("Upload failed: {0}")]
    Failed(String),
}

/// A file picked by the user, ready to be sent to the asset store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Reference returned by the asset store once a file is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub asset_ref: String,
}

/// The asset store collaborator. Errors are user-facing messages.
pub trait AssetUploader {
    fn upload(&mut self, file: &UploadFile) -> Result<StoredAsset, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            allowed_mime_types: ALLOWED_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl UploadLimits {
    pub fn validate(&self, file: &UploadFile) -> Result<(), UploadError> {
        let mime_type = file.mime_type.trim();
        if !self
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(mime_type))
        {
            return Err(UploadError::UnsupportedType(file.mime_type.clone()));
        }
        if file.size() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.size(),
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Validate, upload and insert an image.
///
/// On success the image replaces the modal's target block (or lands after
/// the focused block) and the modal closes. The returned patch is the
/// insertion's.
pub fn submit_image_upload(
    state: &mut EditorState,
    file: &UploadFile,
    alt_text: &str,
    uploader: &mut impl AssetUploader,
    limits: &UploadLimits,
) -> Result<Patch, UploadError> {
    if let Err(err) = limits.validate(file) {
        log::warn!("Rejected upload of {}: {err}", file.name);
        return Err(err);
    }

    log::info!("Uploading {} ({} bytes)", file.name, file.size());
    let stored = uploader.upload(file).map_err(|message| {
        log::warn!("Upload of {} failed: {message}", file.name);
        UploadError::Failed(message)
    })?;

    let replace_block_id = state.image_upload_modal().target_block_id.clone();
    let patch = state.apply(Action::InsertImageBlock {
        asset_ref: stored.asset_ref,
        alt_text: alt_text.to_string(),
        replace_block_id,
    });
    state.apply(Action::HideImageUploadModal);
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, BlockId, BlockType};

    struct FakeStore {
        calls: usize,
        fail_with: Option<String>,
    }

    impl FakeStore {
        fn ok() -> Self {
            Self {
                calls: 0,
                fail_with: None,
            }
        }
    }

    impl AssetUploader for FakeStore {
        fn upload(&mut self, file: &UploadFile) -> Result<StoredAsset, String> {
            self.calls += 1;
            match &self.fail_with {
                Some(message) => Err(message.clone()),
                None => Ok(StoredAsset {
                    asset_ref: format!("image-{}", file.name),
                }),
            }
        }
    }

    fn png(size: usize) -> UploadFile {
        UploadFile {
            name: "cat.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn test_mime_types_compare_case_insensitively() {
        let limits = UploadLimits {
            allowed_mime_types: vec!["image/PNG".to_string()],
            ..UploadLimits::default()
        };
        let mut shouting = png(10);
        shouting.mime_type = "IMAGE/png".to_string();

        assert_eq!(limits.validate(&png(10)), Ok(()));
        assert_eq!(limits.validate(&shouting), Ok(()));
    }

    fn state_with_modal(target: Option<&str>) -> EditorState {
        let mut state = EditorState::new(vec![
            Block::text("a", BlockType::Paragraph, "A"),
            Block::text("b", BlockType::Paragraph, ""),
        ])
        .unwrap();
        state.apply(Action::ShowImageUploadModal {
            target_block_id: target.map(BlockId::from),
        });
        state
    }

    #[test]
    fn test_rejects_unsupported_type_without_calling_out() {
        let mut state = state_with_modal(None);
        let mut store = FakeStore::ok();
        let file = UploadFile {
            mime_type: "image/svg+xml".to_string(),
            ..png(10)
        };

        let err = submit_image_upload(&mut state, &file, "", &mut store, &UploadLimits::default())
            .unwrap_err();

        assert_eq!(err, UploadError::UnsupportedType("image/svg+xml".to_string()));
        assert_eq!(store.calls, 0);
        assert!(state.is_modal_open());
    }

    #[test]
    fn test_rejects_oversized_file_without_calling_out() {
        let mut state = state_with_modal(None);
        let mut store = FakeStore::ok();

        let err = submit_image_upload(
            &mut state,
            &png(MAX_UPLOAD_BYTES as usize + 1),
            "",
            &mut store,
            &UploadLimits::default(),
        )
        .unwrap_err();

        assert!(matches!(err, UploadError::TooLarge { .. }));
        assert_eq!(store.calls, 0);
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let limits = UploadLimits::default();
        assert!(limits.validate(&png(MAX_UPLOAD_BYTES as usize)).is_ok());
    }

    #[test]
    fn test_mime_check_ignores_case() {
        let file = UploadFile {
            mime_type: "IMAGE/JPEG".to_string(),
            ..png(1)
        };
        assert!(UploadLimits::default().validate(&file).is_ok());
    }

    #[test]
    fn test_successful_upload_replaces_target_and_closes_modal() {
        let mut state = state_with_modal(Some("b"));
        let mut store = FakeStore::ok();

        let patch = submit_image_upload(
            &mut state,
            &png(100),
            "A cat",
            &mut store,
            &UploadLimits::default(),
        )
        .unwrap();

        assert_eq!(patch.removed, vec![BlockId::from("b")]);
        assert_eq!(state.blocks().len(), 2);
        let image = &state.blocks()[1];
        let data = image.data.as_ref().unwrap();
        assert_eq!(data.asset_ref, "image-cat.png");
        assert_eq!(data.alt_text, "A cat");
        assert!(!state.is_modal_open());
    }

    #[test]
    fn test_failed_upload_keeps_modal_open() {
        let mut state = state_with_modal(Some("b"));
        let mut store = FakeStore {
            calls: 0,
            fail_with: Some("network unreachable".to_string()),
        };

        let err = submit_image_upload(&mut state, &png(100), "", &mut store, &UploadLimits::default())
            .unwrap_err();

        assert_eq!(err.to_string(), "Upload failed: network unreachable");
        assert!(state.is_modal_open());
        assert_eq!(state.blocks().len(), 2);
        assert!(!state.blocks()[1].is_image());
    }
}
