//! Image set reconciler
//!
//! Tracks, per category or product, the images already stored (`saved`) and
//! the uploads still pending (`unsaved`). Uploads go to the object store
//! before the owning document is written; replaced images are deleted after.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::ImageRef;
use shared::util::snowflake_id;

use crate::storage::{ObjectStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOwner {
    Category,
    Product,
}

impl ImageOwner {
    pub const fn max_images(self) -> usize {
        match self {
            ImageOwner::Category => 1,
            ImageOwner::Product => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ImageOwner::Category => "category",
            ImageOwner::Product => "product",
        }
    }
}

/// File received from the console, not yet in the object store
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingImage {
    /// Lowercased file extension, falling back to the declared MIME type
    fn extension(&self) -> String {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .or_else(|| {
                mime_guess::get_mime_extensions_str(&self.content_type)
                    .and_then(|exts| exts.first())
                    .map(|e| e.to_string())
            })
            .unwrap_or_else(|| "bin".to_string())
    }

    fn mime_type(&self) -> String {
        if self.content_type.starts_with("image/") {
            self.content_type.clone()
        } else {
            mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        }
    }
}

/// Per-file checks applied before anything is uploaded
#[derive(Debug, Clone, Copy)]
pub struct ImagePolicy {
    pub max_bytes: usize,
}

impl ImagePolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn check(&self, file: &PendingImage) -> AppResult<()> {
        if file.bytes.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedImage,
                format!("{} is empty", file.file_name),
            ));
        }
        if file.bytes.len() > self.max_bytes {
            return Err(AppError::with_message(
                ErrorCode::ImageTooLarge,
                format!(
                    "{} is too large. Images must not exceed {} KB",
                    file.file_name,
                    self.max_bytes / 1024
                ),
            ));
        }
        if !file.mime_type().starts_with("image/") || image::guess_format(&file.bytes).is_err()
        {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedImage,
                format!("{} is not a supported image", file.file_name),
            ));
        }
        Ok(())
    }
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self::new(5 * 1024 * 1024)
    }
}

#[derive(Debug)]
pub struct ImageSet {
    owner: ImageOwner,
    saved: Vec<ImageRef>,
    unsaved: Vec<PendingImage>,
    retired: Vec<ImageRef>,
}

impl ImageSet {
    pub fn new(owner: ImageOwner, saved: Vec<ImageRef>) -> Self {
        Self {
            owner,
            saved,
            unsaved: Vec::new(),
            retired: Vec::new(),
        }
    }

    pub fn saved(&self) -> &[ImageRef] {
        &self.saved
    }

    pub fn has_unsaved(&self) -> bool {
        !self.unsaved.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty() && self.unsaved.is_empty()
    }

    /// Stored images dropped by [`ImageSet::retire_saved`], to delete once the
    /// document no longer references them
    pub fn retired(&self) -> &[ImageRef] {
        &self.retired
    }

    /// Queue an upload; rejected past the owner's limit or on a bad file
    pub fn add_local(&mut self, image: PendingImage, policy: &ImagePolicy) -> AppResult<()> {
        let max = self.owner.max_images();
        if self.saved.len() + self.unsaved.len() + 1 > max {
            return Err(AppError::with_message(
                ErrorCode::ImageLimitExceeded,
                format!("A {} can have at most {max} image(s)", self.owner.label()),
            ));
        }
        policy.check(&image)?;
        self.unsaved.push(image);
        Ok(())
    }

    /// Move every stored image out of the set so new uploads replace them
    pub fn retire_saved(&mut self) {
        self.retired.append(&mut self.saved);
    }

    /// Upload every pending image under a fresh key and append it to `saved`
    ///
    /// Returns the references created by this call. On failure the images
    /// uploaded so far stay in the store and are logged as orphans.
    pub async fn commit_upload(
        &mut self,
        store: &dyn ObjectStore,
    ) -> Result<Vec<ImageRef>, StorageError> {
        let mut uploaded = Vec::with_capacity(self.unsaved.len());

        for image in std::mem::take(&mut self.unsaved) {
            let key = format!("{}.{}", snowflake_id(), image.extension());
            let content_type = image.mime_type();
            if let Err(e) = store.put_object(&key, image.bytes, &content_type).await {
                if !uploaded.is_empty() {
                    let keys: Vec<&str> = uploaded.iter().map(|i: &ImageRef| i.key.as_str()).collect();
                    tracing::warn!(owner = self.owner.label(), keys = ?keys, "Upload aborted, stored images left orphaned");
                }
                return Err(e);
            }
            uploaded.push(ImageRef::new(&key, store.public_link(&key)));
        }

        self.saved.extend(uploaded.iter().cloned());
        Ok(uploaded)
    }

    /// Guard for removing one stored image
    ///
    /// The last image of an entity cannot be removed this way.
    pub fn check_removable(&self, key: &str) -> AppResult<()> {
        if !self.saved.iter().any(|image| image.key == key) {
            return Err(AppError::validation(format!(
                "Image {key} does not belong to this {}",
                self.owner.label()
            )));
        }
        if self.saved.len() == 1 {
            return Err(AppError::new(ErrorCode::ImageRequired));
        }
        Ok(())
    }

    /// Delete one stored image from the object store
    ///
    /// Only the blob is touched; the caller pulls the reference from the
    /// owning document afterwards.
    pub async fn delete_saved(
        &mut self,
        key: &str,
        store: &dyn ObjectStore,
    ) -> Result<ImageRef, crate::error::ServiceError> {
        self.check_removable(key)?;
        store.delete_object(key).await?;

        let position = self
            .saved
            .iter()
            .position(|image| image.key == key)
            .ok_or_else(|| AppError::internal("image vanished from set"))?;
        Ok(self.saved.remove(position))
    }
}

/// Orphans left behind when the document write after an upload fails
pub fn log_orphaned_uploads(operation: &str, uploaded: &[ImageRef]) {
    if uploaded.is_empty() {
        return;
    }
    let keys: Vec<&str> = uploaded.iter().map(|i| i.key.as_str()).collect();
    tracing::warn!(operation, keys = ?keys, "Document write failed, uploaded images left orphaned");
}

/// Delete replaced images after their document stopped referencing them
pub async fn delete_retired(store: &dyn ObjectStore, retired: &[ImageRef]) {
    if retired.is_empty() {
        return;
    }
    let keys: Vec<String> = retired.iter().map(|i| i.key.clone()).collect();
    if let Err(e) = store.delete_objects(&keys).await {
        tracing::warn!(keys = ?keys, error = %e, "Replaced images could not be deleted, left orphaned");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryObjectStore;

    pub(crate) fn png(name: &str) -> PendingImage {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(b"\0\0\0\rIHDR");
        PendingImage {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes,
        }
    }

    #[test]
    fn test_category_takes_one_image() {
        let policy = ImagePolicy::default();
        let mut set = ImageSet::new(ImageOwner::Category, vec![]);
        set.add_local(png("a.png"), &policy).unwrap();

        let err = set.add_local(png("b.png"), &policy).unwrap_err();
        assert_eq!(err.code, ErrorCode::ImageLimitExceeded);
    }

    #[test]
    fn test_product_limit_counts_saved_images() {
        let policy = ImagePolicy::default();
        let saved = vec![ImageRef::new("1.png", ""), ImageRef::new("2.png", "")];
        let mut set = ImageSet::new(ImageOwner::Product, saved);
        set.add_local(png("c.png"), &policy).unwrap();
        assert!(set.add_local(png("d.png"), &policy).is_err());
    }

    #[test]
    fn test_policy_rejects_non_images_and_oversize() {
        let policy = ImagePolicy::new(16);
        let text = PendingImage {
            file_name: "notes.txt".into(),
            content_type: "text/plain".into(),
            bytes: b"hello".to_vec(),
        };
        assert_eq!(policy.check(&text).unwrap_err().code, ErrorCode::UnsupportedImage);

        let mut big = png("big.png");
        big.bytes.resize(64, 0);
        assert_eq!(policy.check(&big).unwrap_err().code, ErrorCode::ImageTooLarge);

        let disguised = PendingImage {
            file_name: "fake.png".into(),
            content_type: "image/png".into(),
            bytes: b"not really".to_vec(),
        };
        assert!(ImagePolicy::default().check(&disguised).is_err());
    }

    #[tokio::test]
    async fn test_commit_upload_appends_saved() {
        let store = MemoryObjectStore::new();
        let policy = ImagePolicy::default();
        let mut set = ImageSet::new(ImageOwner::Product, vec![ImageRef::new("old.png", "")]);
        set.add_local(png("a.png"), &policy).unwrap();
        set.add_local(png("b.jpeg"), &policy).unwrap();

        let uploaded = set.commit_upload(&store).await.unwrap();
        assert_eq!(uploaded.len(), 2);
        assert_eq!(set.saved().len(), 3);
        assert!(!set.has_unsaved());
        assert!(uploaded[0].key.ends_with(".png"));
        assert!(uploaded[1].key.ends_with(".jpeg"));
        assert_ne!(uploaded[0].key, uploaded[1].key);
        assert!(store.contains(&uploaded[0].key));
        assert_eq!(uploaded[0].link, store.public_link(&uploaded[0].key));
    }

    #[tokio::test]
    async fn test_retire_then_replace() {
        let store = MemoryObjectStore::new();
        let mut set = ImageSet::new(ImageOwner::Category, vec![ImageRef::new("old.png", "")]);
        set.retire_saved();
        set.add_local(png("new.png"), &ImagePolicy::default()).unwrap();
        set.commit_upload(&store).await.unwrap();

        assert_eq!(set.saved().len(), 1);
        assert_eq!(set.retired(), &[ImageRef::new("old.png", "")]);
    }

    #[tokio::test]
    async fn test_last_image_cannot_be_deleted() {
        let store = MemoryObjectStore::new();
        store.insert("only.png", b"x", "image/png");
        let mut set = ImageSet::new(ImageOwner::Product, vec![ImageRef::new("only.png", "")]);

        let err = set.delete_saved("only.png", &store).await.unwrap_err();
        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::ImageRequired);
        assert_eq!(err.message, "at least one image required");
        assert!(store.contains("only.png"));
        assert_eq!(set.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_saved_removes_blob() {
        let store = MemoryObjectStore::new();
        store.insert("a.png", b"a", "image/png");
        store.insert("b.png", b"b", "image/png");
        let mut set = ImageSet::new(
            ImageOwner::Product,
            vec![ImageRef::new("a.png", ""), ImageRef::new("b.png", "")],
        );

        let removed = set.delete_saved("a.png", &store).await.unwrap();
        assert_eq!(removed.key, "a.png");
        assert!(!store.contains("a.png"));
        assert_eq!(set.saved(), &[ImageRef::new("b.png", "")]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let set = ImageSet::new(
            ImageOwner::Product,
            vec![ImageRef::new("a.png", ""), ImageRef::new("b.png", "")],
        );
        assert_eq!(
            set.check_removable("c.png").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }
}
