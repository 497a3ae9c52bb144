use crate::models::*;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use std::path::Path;

pub const API_URL: &str = "http://localhost:8000";

/// The three calls the chat view makes against the backend.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn upload_pdf(&self, file: PdfFile) -> Result<Value>;
    async fn ask_question(&self, document_id: i64, question: &str) -> Result<AnswerResponse>;
    async fn get_documents(&self) -> Result<Vec<Document>>;
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct PdfFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| anyhow::anyhow!("{} does not name a file", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        Ok(Self { name, bytes })
    }

    fn mime(&self) -> &'static str {
        if self.name.to_lowercase().ends_with(".pdf") {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }
}

/// HTTP client for the PDF chat backend. Status codes are not inspected:
/// any body that parses is handed back as a success.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_upload(&self, file: PdfFile) -> Result<Value> {
        let mime = file.mime();
        let name = file.name;
        let part = Part::bytes(file.bytes)
            .file_name(name.clone())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let response = self.client
            .post(format!("{}/upload/", self.base_url))
            .multipart(form)
            .send()
            .await?;

        log::debug!("Upload of {} answered with {}", name, response.status());
        let body: Value = response.json().await?;

        let receipt: UploadReceipt = serde_json::from_value(body.clone()).unwrap_or_default();
        if let Some(id) = receipt.document_id {
            log::info!("Backend stored {} as document {}", name, id);
        }

        Ok(body)
    }

    async fn send_question(&self, document_id: i64, question: &str) -> Result<AnswerResponse> {
        let request = QuestionRequest {
            question: question.to_string(),
        };

        let response = self.client
            .post(format!("{}/ask/{}", self.base_url, document_id))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        log::debug!("Ask on document {} answered with {}", document_id, response.status());
        let body: Value = response.json().await?;
        Ok(AnswerResponse::from_body(&body))
    }

    async fn fetch_documents(&self) -> Result<Vec<Document>> {
        let response = self.client
            .get(format!("{}/documents/", self.base_url))
            .send()
            .await?;

        let documents: Vec<Document> = response.json().await?;
        log::info!("Fetched {} documents", documents.len());
        Ok(documents)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    async fn upload_pdf(&self, file: PdfFile) -> Result<Value> {
        self.send_upload(file)
            .await
            .inspect_err(|e| log::error!("Error uploading PDF: {:#}", e))
    }

    async fn ask_question(&self, document_id: i64, question: &str) -> Result<AnswerResponse> {
        self.send_question(document_id, question)
            .await
            .inspect_err(|e| log::error!("Error asking question: {:#}", e))
    }

    async fn get_documents(&self) -> Result<Vec<Document>> {
        self.fetch_documents()
            .await
            .inspect_err(|e| log::error!("Error fetching documents: {:#}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn default_client_targets_localhost() {
        assert_eq!(ApiClient::new().base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn get_documents_parses_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "filename": "a.pdf" },
                { "id": 2, "filename": "b.pdf", "original_filename": "b.pdf" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri());
        let docs = client.get_documents().await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], Document::new(1, "a.pdf"));
        assert_eq!(docs[1].filename, "b.pdf");
    }

    #[tokio::test]
    async fn ask_posts_question_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask/3"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "question": "What is the total?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "$4,200" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri());
        let reply = client.ask_question(3, "What is the total?").await.unwrap();

        assert_eq!(reply.answer, "$4,200");
    }

    #[tokio::test]
    async fn error_status_with_json_body_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask/9"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "detail": "Document not found" })),
            )
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri());
        let reply = client.ask_question(9, "anything").await.unwrap();

        assert_eq!(reply.answer, "");
    }

    #[tokio::test]
    async fn null_or_non_object_answer_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": null })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/ask/2"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!("oops")))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri());

        assert_eq!(client.ask_question(1, "q").await.unwrap().answer, "");
        assert_eq!(client.ask_question(2, "q").await.unwrap().answer, "");
    }

    #[tokio::test]
    async fn non_json_body_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri());
        assert!(client.get_documents().await.is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_fails() {
        let client = ApiClient::with_base_url("http://127.0.0.1:1");
        assert!(client.get_documents().await.is_err());
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"notes.pdf\""))
            .and(body_string_contains("%PDF-1.4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "document_id": 7,
                "message": "PDF uploaded and processed successfully",
                "filename": "notes.pdf",
                "file_path": "./uploads/x_notes.pdf"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::with_base_url(server.uri());
        let file = PdfFile::new("notes.pdf", b"%PDF-1.4 body".to_vec());
        let body = client.upload_pdf(file).await.unwrap();

        assert_eq!(body["document_id"], 7);
    }

    #[tokio::test]
    async fn open_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let mut handle = std::fs::File::create(&path).unwrap();
        handle.write_all(b"%PDF-1.7").unwrap();

        let file = PdfFile::open(&path).await.unwrap();

        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.bytes, b"%PDF-1.7");
        assert_eq!(file.mime(), "application/pdf");
    }

    #[tokio::test]
    async fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PdfFile::open(dir.path().join("missing.pdf")).await.is_err());
    }
}
