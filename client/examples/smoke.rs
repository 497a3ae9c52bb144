use pdf_chat::{ApiClient, DocumentApi, PdfFile};
use std::env;

// Usage: cargo run -p pdf_chat --example smoke [file.pdf] [question]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = ApiClient::new();
    let mut args = env::args().skip(1);

    println!("🔍 Testing PDF chat backend at {}", client.base_url());

    if let Some(path) = args.next() {
        println!("\n📤 Upload:");
        let file = PdfFile::open(&path).await?;
        let body = client.upload_pdf(file).await?;
        println!("Response: {}", serde_json::to_string_pretty(&body)?);
    }

    println!("\n📚 Documents:");
    let documents = client.get_documents().await?;
    for doc in &documents {
        println!("  [{}] {}", doc.id, doc.filename);
    }

    if let (Some(question), Some(doc)) = (args.next(), documents.last()) {
        println!("\n❓ Asking {} about {}:", question, doc.filename);
        let reply = client.ask_question(doc.id, &question).await?;
        println!("Answer: {}", reply.answer);
    }

    println!("\n✅ Smoke test completed!");
    Ok(())
}
