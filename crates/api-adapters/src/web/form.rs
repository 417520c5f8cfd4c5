//! Request body that is either plain JSON or `multipart/form-data` with a
//! JSON `data` part and an optional `file` part.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use domains::MediaUpload;
use mime::Mime;
use serde::de::DeserializeOwned;

use super::error::ApiError;

pub struct CommentForm<T> {
    pub data: T,
    pub file: Option<MediaUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// Declared content type, else a guess from the file name.
fn upload_content_type(declared: Option<&str>, file_name: Option<&str>) -> Mime {
    declared
        .and_then(|ct| ct.parse::<Mime>().ok())
        .or_else(|| file_name.and_then(|name| mime_guess::from_path(name).first()))
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

impl<S, T> FromRequest<S> for CommentForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Json(data) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return Ok(Self { data, file: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        let mut data = None;
        let mut file = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| ApiError::bad_request(err.body_text()))?
        {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("data") => {
                    let raw = field
                        .bytes()
                        .await
                        .map_err(|err| ApiError::bad_request(err.body_text()))?;
                    let parsed = serde_json::from_slice::<T>(&raw)
                        .map_err(|err| ApiError::bad_request(format!("invalid data part: {err}")))?;
                    data = Some(parsed);
                }
                Some("file") => {
                    let file_name = field.file_name().map(str::to_owned);
                    let content_type =
                        upload_content_type(field.content_type(), file_name.as_deref());
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|err| ApiError::bad_request(err.body_text()))?;
                    // browsers send an empty part when no file was picked
                    if !bytes.is_empty() {
                        let mut upload = MediaUpload::new(bytes, content_type);
                        upload.file_name = file_name;
                        file = Some(upload);
                    }
                }
                _ => {}
            }
        }

        let data = data.ok_or_else(|| ApiError::bad_request("missing `data` part"))?;
        Ok(Self { data, file })
    }
}
