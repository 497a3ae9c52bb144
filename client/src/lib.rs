pub mod models;
pub mod api_client;
pub mod chat_view;
pub mod render;

pub use models::*;
pub use api_client::{ApiClient, DocumentApi, PdfFile, API_URL};
pub use chat_view::{ActionError, ChatEvent, ChatState, ChatView};
pub use render::{render, RenderOptions};
