use bytes::Bytes;
use mime::Mime;

/// Raw image bytes handed to the `MediaStorage` port.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Bytes,
    pub content_type: Mime,
    pub file_name: Option<String>,
}

impl MediaUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: Mime) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Where a comment image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Already hosted somewhere; stored as-is.
    Url(String),
    /// Needs to go through the upload collaborator first.
    Upload(MediaUpload),
}
