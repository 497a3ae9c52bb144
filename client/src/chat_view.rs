use crate::api_client::{DocumentApi, PdfFile};
use crate::models::*;
use thiserror::Error;
use tokio::sync::watch;

/// The banner texts shown to the user. The underlying cause is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Error fetching documents")]
    FetchDocuments,
    #[error("Error uploading file")]
    Upload,
    #[error("Error getting answer")]
    Ask,
}

/// Everything the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub documents: Vec<Document>,
    pub selected: Option<Document>,
    pub question: String,
    pub transcript: Vec<ChatMessage>,
    pub loading: bool,
    pub error: Option<ActionError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    DocumentsLoaded(Vec<Document>),
    DocumentSelected(Option<i64>),
    QuestionEdited(String),
    UploadStarted,
    UploadSucceeded { filename: String },
    AskStarted,
    AnswerReceived(String),
    Failed(ActionError),
    Settled,
}

impl ChatState {
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::DocumentsLoaded(documents) => self.documents = documents,
            ChatEvent::DocumentSelected(id) => {
                self.selected = id.and_then(|id| self.documents.iter().find(|d| d.id == id).cloned());
            }
            ChatEvent::QuestionEdited(question) => self.question = question,
            ChatEvent::UploadStarted => self.loading = true,
            ChatEvent::UploadSucceeded { filename } => {
                self.error = None;
                self.transcript
                    .push(ChatMessage::system(format!("Successfully uploaded {}", filename)));
            }
            ChatEvent::AskStarted => {
                self.transcript.push(ChatMessage::human(self.question.clone()));
                self.loading = true;
            }
            ChatEvent::AnswerReceived(answer) => {
                self.transcript.push(ChatMessage::assistant(answer));
                self.question.clear();
            }
            ChatEvent::Failed(error) => self.error = Some(error),
            ChatEvent::Settled => self.loading = false,
        }
    }

    /// A question goes out only with a selected document and a non-blank draft.
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.question.trim().is_empty()
    }

    /// Mirrors the disabled input of the page.
    pub fn input_enabled(&self) -> bool {
        self.selected.is_some() && !self.loading
    }
}

/// Owns the chat state, drives the backend and publishes every new state.
pub struct ChatView<A> {
    api: A,
    state: ChatState,
    tx: watch::Sender<ChatState>,
}

impl<A: DocumentApi> ChatView<A> {
    pub fn new(api: A) -> Self {
        let (tx, _rx) = watch::channel(ChatState::default());
        Self {
            api,
            state: ChatState::default(),
            tx,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.tx.subscribe()
    }

    fn dispatch(&mut self, event: ChatEvent) {
        log::debug!("Applying {:?}", event);
        self.state.apply(event);
        self.tx.send_replace(self.state.clone());
    }

    /// Initial load; also run after every successful upload.
    pub async fn refresh_documents(&mut self) {
        match self.api.get_documents().await {
            Ok(documents) => self.dispatch(ChatEvent::DocumentsLoaded(documents)),
            Err(e) => {
                log::warn!("Keeping {} known documents: {:#}", self.state.documents.len(), e);
                self.dispatch(ChatEvent::Failed(ActionError::FetchDocuments));
            }
        }
    }

    pub fn select_document(&mut self, id: Option<i64>) {
        self.dispatch(ChatEvent::DocumentSelected(id));
    }

    pub fn edit_question(&mut self, question: impl Into<String>) {
        self.dispatch(ChatEvent::QuestionEdited(question.into()));
    }

    pub async fn upload(&mut self, file: Option<PdfFile>) {
        let Some(file) = file else {
            return;
        };

        log::info!("Uploading {} ({} bytes)", file.name, file.bytes.len());
        self.dispatch(ChatEvent::UploadStarted);

        let filename = file.name.clone();
        match self.api.upload_pdf(file).await {
            Ok(_) => {
                self.refresh_documents().await;
                self.dispatch(ChatEvent::UploadSucceeded { filename });
            }
            Err(_) => self.dispatch(ChatEvent::Failed(ActionError::Upload)),
        }

        self.dispatch(ChatEvent::Settled);
    }

    /// Submits the current draft. Returns without touching anything when
    /// there is nothing to submit.
    pub async fn ask(&mut self) {
        if !self.state.can_submit() {
            return;
        }
        let Some(document_id) = self.state.selected.as_ref().map(|d| d.id) else {
            return;
        };
        let question = self.state.question.clone();

        self.dispatch(ChatEvent::AskStarted);

        match self.api.ask_question(document_id, &question).await {
            Ok(reply) => self.dispatch(ChatEvent::AnswerReceived(reply.answer)),
            Err(_) => self.dispatch(ChatEvent::Failed(ActionError::Ask)),
        }

        self.dispatch(ChatEvent::Settled);
    }
}
