mod command;
mod screen;

use anyhow::Result;
use command::Command;
use pdf_chat::{ApiClient, ChatView, PdfFile};
use tokio::io::{self, AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let client = ApiClient::new();
    log::info!("Using backend at {}", client.base_url());

    let mut view = ChatView::new(client);
    let redraw = tokio::spawn(screen::redraw_loop(view.subscribe()));

    screen::draw(view.state())?;
    view.refresh_documents().await;

    let mut stdin = BufReader::new(io::stdin());
    let mut line = Vec::new();
    loop {
        line.clear();
        if stdin.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if std::str::from_utf8(&line).is_err() {
            log::warn!("Input line is not valid UTF-8, replacing invalid bytes");
        }
        let Some(command) = command::parse_bytes(&line) else {
            continue;
        };

        match command {
            Command::Upload(path) => {
                let file = match path {
                    Some(path) => match PdfFile::open(&path).await {
                        Ok(file) => Some(file),
                        Err(e) => {
                            log::warn!("Could not open {}: {:#}", path.display(), e);
                            println!("Could not open {}", path.display());
                            None
                        }
                    },
                    None => None,
                };
                view.upload(file).await;
            }
            Command::Select(id) => view.select_document(id),
            Command::Docs => {
                let documents = &view.state().documents;
                if documents.is_empty() {
                    println!("No documents yet");
                }
                for doc in documents {
                    println!("[{}] {}", doc.id, doc.filename);
                }
            }
            Command::Retry => view.ask().await,
            Command::Help => println!("{}", command::HELP),
            Command::Quit => break,
            Command::Ask(question) => {
                view.edit_question(question);
                view.ask().await;
            }
            Command::Unknown(name) => println!("Unknown command /{}, try /help", name),
        }
    }

    drop(view);
    redraw.await?;
    Ok(())
}
