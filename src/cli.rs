//! Command line entry point.
//!
//! ```sh
//! glossary start --port 8080
//! glossary --environment production doctor
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::{
    boot,
    config::Config,
    environment::{resolve_from_env, Environment},
    glossary::{document, integrity, IntegrityReport, TermCollection},
    logger, Error, Result,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, global = true, help = &format!("Specify the environment [default: {}]", resolve_from_env()))]
    environment: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Start {
        /// Server bind address
        #[arg(short, long)]
        binding: Option<String>,
        /// Server port address
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load the glossary document and report on its relations
    Doctor,
}

/// Parses the command line and runs the selected command.
///
/// # Errors
///
/// Fails when configuration, logging or the selected command fails.
pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    let environment: Environment = cli.environment.unwrap_or_else(resolve_from_env).into();
    let config = environment.load()?;
    logger::init(&config.logger)?;

    match cli.command {
        Commands::Start { binding, port } => {
            let binding = binding.unwrap_or_else(|| config.server.binding.clone());
            let port = port.unwrap_or(config.server.port);
            let ctx = boot::create_context(&environment, config).await?;
            boot::start(ctx, &binding, port).await?;
        }
        Commands::Doctor => doctor(&config).await?,
    }
    Ok(())
}

async fn doctor(config: &Config) -> Result<()> {
    let path = &config.glossary.path;
    let terms = match load_document(path) {
        Ok(terms) => {
            println!("{} document: {}", "✅".green(), path.display());
            terms
        }
        Err(err) => {
            println!(
                "{} document: {}\n   {}",
                "❌".red(),
                path.display(),
                err.to_string().dimmed()
            );
            return Err(err);
        }
    };

    let categories = terms.categories();
    let report = integrity::scan(&terms);

    println!(
        "{} terms: {}, relations: {}",
        "✅".green(),
        report.terms,
        report.relations
    );
    if categories.is_empty() {
        println!("{} categories: none", "⚠️".yellow());
    } else {
        println!("{} categories: {}", "✅".green(), categories.join(", "));
    }
    print_dangling(&report);
    Ok(())
}

/// Reads the document without creating it.
fn load_document(path: &Path) -> Result<TermCollection> {
    document::read(path)?.ok_or_else(|| {
        Error::Message(format!(
            "glossary document `{}` does not exist",
            path.display()
        ))
    })
}

fn print_dangling(report: &IntegrityReport) {
    if report.is_consistent() {
        println!("{} relations: every target resolves", "✅".green());
        return;
    }
    println!(
        "{} relations: {} dangling",
        "⚠️".yellow(),
        report.dangling.len()
    );
    for dangling in &report.dangling {
        println!(
            "   {} --{}--> {}",
            dangling.source,
            dangling.relation_type,
            dangling.target.to_string().red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::load_document;
    use crate::glossary::{document, TermCollection, TermInput, TermId};

    #[test]
    fn missing_document_is_reported_and_not_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("glossary.json");

        let err = load_document(&path).expect_err("missing document");

        assert!(err.to_string().contains("does not exist"));
        assert!(!path.exists());
    }

    #[test]
    fn existing_document_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("glossary.json");
        let mut terms = TermCollection::new();
        terms.upsert(
            TermInput::new("Facade", "Simplified interface")
                .with_category("Structural")
                .into_term(TermId::new("facade")),
        );
        document::write(&path, &terms).expect("write");

        let loaded = load_document(&path).expect("document");

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.categories(), vec!["Structural".to_string()]);
    }
}
