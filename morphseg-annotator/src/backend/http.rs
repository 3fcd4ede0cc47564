//! HTTP client for the annotation backend
//!
//! Routes (all relative to the configured base URL):
//!
//! | Operation | Route |
//! |---|---|
//! | login | `GET /user/{email}?width=` |
//! | fetch queue | `GET /words/{uid}` |
//! | fetch word | `GET /word/{word}?uid=` |
//! | split sense | `POST /sense/{context_id}` |
//! | audit | `POST /log/reset`, `POST /log/click` |
//! | noise / skip | `POST /nonword/{word}`, `POST /skip/{word}` |
//! | segmentation | `POST /b2seg/{word}` |
//! | final annotation | `POST /word/{word}` |
//!
//! Posts are form-encoded; structured fields travel as JSON strings.

use super::{Backend, BackendError, Operation};
use crate::models::{SenseContext, WordBucket, WordDetail, WorkerSession};
use async_trait::async_trait;
use morphseg_common::api::{
    AnnotationForm, LogForm, LoginQuery, LoginResponse, SegmentationForm, SegmentedResponse,
    UidForm, UidQuery, WordResponse, WordsResponse,
};
use morphseg_common::TagKind;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("morphseg-annotator/", env!("CARGO_PKG_VERSION"));

/// Backend reached over HTTP
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::Network(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Network(format!(
                "Backend URL '{}' can not be used as a base",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with percent-encoded path segments appended
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<Q, T>(&self, op: Operation, segments: &[&str], query: &Q) -> Result<T, BackendError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(segments);
        debug!(op = %op, url = %url, "GET");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn post<F>(
        &self,
        op: Operation,
        segments: &[&str],
        form: &F,
    ) -> Result<reqwest::Response, BackendError>
    where
        F: Serialize + ?Sized,
    {
        let url = self.url(segments);
        debug!(op = %op, url = %url, "POST");

        let response = self
            .http_client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn log(&self, handle: &str, uid: &str, message: String) -> Result<(), BackendError> {
        let op = match handle {
            "reset" => Operation::AuditReset,
            _ => Operation::AuditBoundaryClick,
        };
        let form = LogForm {
            uid: uid.to_string(),
            message,
        };
        self.post(op, &["log", handle], &form).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(BackendError::Status(status.as_u16(), error_text))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, BackendError> {
    serde_json::to_string(value).map_err(|e| BackendError::Parse(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, email: &str, width: u32) -> Result<WorkerSession, BackendError> {
        let response: LoginResponse = self
            .get(Operation::Login, &["user", email], &LoginQuery { width })
            .await?;

        info!(
            uid = %response.uid,
            annotated = response.annotated,
            iteration = response.iteration,
            "Logged in"
        );
        Ok(WorkerSession::new(response.uid, response.annotated, response.iteration))
    }

    async fn fetch_queue(&self, uid: &str) -> Result<Vec<WordBucket>, BackendError> {
        let no_query: [(&str, &str); 0] = [];
        let response: WordsResponse = self
            .get(Operation::FetchQueue, &["words", uid], &no_query)
            .await?;

        Ok(response
            .words
            .into_iter()
            .map(|(label, has_prediction, forms)| WordBucket::new(label, has_prediction, forms))
            .collect())
    }

    async fn fetch_word(&self, form: &str, uid: &str) -> Result<WordDetail, BackendError> {
        let query = UidQuery {
            uid: uid.to_string(),
        };
        let response: WordResponse = self.get(Operation::FetchWord, &["word", form], &query).await?;

        Ok(WordDetail {
            word: response.word,
            boundaries: response.boundaries,
            contexts: response
                .contexts
                .into_iter()
                .map(|(left, right, id)| SenseContext::new(left, right, id))
                .collect(),
        })
    }

    async fn split_sense(&self, context_id: &str, uid: &str) -> Result<(), BackendError> {
        let form = UidForm {
            uid: uid.to_string(),
        };
        self.post(Operation::SplitSense, &["sense", context_id], &form)
            .await?;
        Ok(())
    }

    async fn audit_reset(&self, uid: &str, form: &str) -> Result<(), BackendError> {
        self.log("reset", uid, form.to_string()).await
    }

    async fn audit_boundary_click(&self, uid: &str, index: usize) -> Result<(), BackendError> {
        self.log("click", uid, index.to_string()).await
    }

    async fn mark_noise(&self, form: &str, uid: &str) -> Result<(), BackendError> {
        let body = UidForm {
            uid: uid.to_string(),
        };
        self.post(Operation::MarkNoise, &["nonword", form], &body)
            .await?;
        Ok(())
    }

    async fn mark_skip(&self, form: &str, uid: &str) -> Result<(), BackendError> {
        let body = UidForm {
            uid: uid.to_string(),
        };
        self.post(Operation::MarkSkip, &["skip", form], &body).await?;
        Ok(())
    }

    async fn submit_segmentation(
        &self,
        form: &str,
        uid: &str,
        boundaries: &[bool],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<Vec<String>, BackendError> {
        let body = SegmentationForm {
            uid: uid.to_string(),
            boundaries: to_json(boundaries)?,
            contexts: to_json(contexts)?,
        };
        let response = self
            .post(Operation::SubmitSegmentation, &["b2seg", form], &body)
            .await?;
        let segmented: SegmentedResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        debug!(word = %segmented.word, morphs = ?segmented.segmented, "Segmentation proposed");
        Ok(segmented.segmented)
    }

    async fn submit_final(
        &self,
        form: &str,
        uid: &str,
        boundaries: &[bool],
        tags: &[TagKind],
        contexts: &BTreeMap<String, bool>,
    ) -> Result<(), BackendError> {
        let body = AnnotationForm {
            uid: uid.to_string(),
            boundaries: to_json(boundaries)?,
            tags: to_json(tags)?,
            contexts: to_json(contexts)?,
        };
        self.post(Operation::SubmitFinal, &["word", form], &body)
            .await?;
        info!(word = %form, "Annotation stored");
        Ok(())
    }
}
