use anyhow::{Context, Result};
use colored::Colorize;

use crate::{
    app::{get_config_dir, init_config, Config},
    docs::{extract_mermaid_blocks, Category, DocumentStore},
    models::ModelFactory,
    utils::count_tokens,
};

use super::Commands;

/// Handle CLI subcommands. Returns false when the chat should start.
pub async fn handle_command(command: &Commands, config: &Config) -> Result<bool> {
    match command {
        Commands::Init => {
            println!("Initializing mentor configuration...");
            init_config()?;
            println!("Configuration initialized successfully!");
            Ok(true)
        }
        Commands::Docs => {
            list_documents(config)?;
            Ok(true)
        }
        Commands::Status => {
            show_status(config).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false),
    }
}

/// Show version information
pub fn show_version() {
    println!("mentor v{}", env!("CARGO_PKG_VERSION"));
    println!("   An on-boarding mentor for organization charts and personal notes");
}

/// List every loaded document with its size in tokens
pub fn list_documents(config: &Config) -> Result<()> {
    let store = DocumentStore::from_config(&config.documents);
    let docs = store.load().context("Failed to load documents")?;
    let model = &config.agents.graph.model;

    for category in [Category::Org, Category::Personal] {
        let files = docs.category(category);
        println!(
            "{} ({}, {} files)",
            category.to_string().bold(),
            store.dir(category).display(),
            files.len()
        );
        for (name, content) in files {
            let diagrams = extract_mermaid_blocks(content).len();
            println!(
                "  • {} ~{} tokens, {} diagrams",
                name.green(),
                count_tokens(content, model),
                diagrams
            );
        }
    }

    println!(
        "\n{} documents, ~{} tokens in total",
        docs.len(),
        docs.total_tokens(model)
    );
    Ok(())
}

/// Show API key presence, document directories and configuration location
async fn show_status(config: &Config) -> Result<()> {
    println!("Mentor Status:");
    println!();

    println!("  API keys:");
    for (env, present) in ModelFactory::api_key_status(config) {
        if present {
            println!("    [OK] {}: Set", env);
        } else {
            println!("    [{}] {}: Not set", "MISSING".red(), env);
        }
    }

    println!("\n  Documents:");
    let store = DocumentStore::from_config(&config.documents);
    for category in [Category::Org, Category::Personal] {
        let dir = store.dir(category);
        if dir.is_dir() {
            println!("    [OK] {}: {}", category, dir.display());
        } else {
            println!("    [WARNING] {}: {} does not exist", category, dir.display());
        }
    }

    println!("\n  Configuration:");
    let config_path = get_config_dir()?.join("config.toml");
    if config_path.exists() {
        println!("    [OK] {}", config_path.display());
    } else {
        println!("    [WARNING] Not found (using defaults); run `mentor init`");
    }

    println!("\n  Connections:");
    for (label, settings) in [
        ("graph", &config.agents.graph),
        ("text", &config.agents.text),
        ("coordinator", &config.agents.coordinator),
    ] {
        let reachable = ModelFactory::validate(settings, &config.llm).await;
        let mark = if reachable { "OK".green() } else { "UNREACHABLE".red() };
        println!("    [{}] {} ({})", mark, label, settings.model);
    }

    println!();
    Ok(())
}
