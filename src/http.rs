//! `reqwest`-backed [`CoverSlidesClient`].

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::error::{CoverError, CoverResult};
use crate::payload::{FieldValue, MultipartPayload};
use crate::service::CoverSlidesClient;
use crate::state::CoverSaveResponse;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const COVER_SLIDES_PATH: &str = "/cover-slides";

/// Talks to the profile API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpCoverSlidesClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCoverSlidesClient {
    pub fn new(base_url: &str) -> CoverResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CoverError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COVER_SLIDES_PATH)
    }
}

#[async_trait::async_trait]
impl CoverSlidesClient for HttpCoverSlidesClient {
    async fn submit(
        &self,
        token: &str,
        payload: MultipartPayload,
    ) -> CoverResult<CoverSaveResponse> {
        let form = to_form(payload)?;
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoverError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CoverError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(CoverError::ServerStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        CoverSaveResponse::from_json(&text).map_err(|e| CoverError::ResponseParse(e.to_string()))
    }
}

fn to_form(payload: MultipartPayload) -> CoverResult<Form> {
    payload
        .into_fields()
        .into_iter()
        .try_fold(Form::new(), |form, field| -> CoverResult<Form> {
            Ok(match field.value {
                FieldValue::Text(value) => form.text(field.name, value),
                FieldValue::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(mime)
                        .map_err(|e| CoverError::Transport(e.to_string()))?;
                    form.part(field.name, part)
                }
            })
        })
}
