use anyhow::Result;
use m360_core::chat::quick_actions;
use m360_core::config::AppConfig;
use m360_interaction::{ChatService, Responder};
use serde_json::json;

pub async fn run(config: &AppConfig, text: &str) -> Result<()> {
    let service = ChatService::new(Responder::from_config(config));
    let Some(reply) = service.send(text).await else {
        anyhow::bail!("Nothing to ask: input is empty");
    };

    let output = json!({
        "message": &reply,
        "quick_actions": quick_actions(&reply),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
