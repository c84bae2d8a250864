use anyhow::Result;
use clap::Parser;
use class_content::cli::{Cli, Commands, OutputFormat};
use class_content::config::{ContentConfig, resolve_cfr_path};
use class_content::decompile::CfrDecompiler;
use class_content::locator::ClassLocator;
use class_content::resolver::ContentResolver;
use class_content::scratch::ScratchSpace;
use class_content::sources::SiblingSourceArchives;
use class_content::translate::{CommandTranslator, SourceTranslator};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    match cli.command.clone() {
        Commands::Resolve {
            locator,
            format,
            output,
        } => {
            let locator: ClassLocator = locator.parse()?;
            let resolver = build_resolver(&cli)?;

            let start = Instant::now();
            let (canonical, content) = resolver.resolve(&locator)?;
            let result = ResolveOutput {
                locator: canonical.to_string(),
                extension: canonical.extension().as_str().to_string(),
                content_hash: hash_content(&content),
                duration_ms: start.elapsed().as_millis() as u64,
                content,
            };
            write_output(&result, format, output.as_deref())?;
        }
    }

    Ok(())
}

fn build_resolver(cli: &Cli) -> Result<ContentResolver> {
    let config = ContentConfig {
        translate_to_kotlin: cli.translate_cmd.is_some(),
        ..ContentConfig::default()
    };
    let translator = cli
        .translate_cmd
        .clone()
        .map(|cmd| Arc::new(CommandTranslator::new(cmd)) as Arc<dyn SourceTranslator>);
    let decompiler = CfrDecompiler::new(resolve_cfr_path(cli.cfr.as_deref())?);

    Ok(ContentResolver::new(
        config,
        Arc::new(SiblingSourceArchives),
        Arc::new(decompiler),
        translator,
        ScratchSpace::new()?,
    ))
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    locator: String,
    extension: String,
    content_hash: String,
    duration_ms: u64,
    content: String,
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn write_output(result: &ResolveOutput, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("locator: {}\n", result.locator));
            out.push_str(&format!("extension: {}\n", result.extension));
            out.push_str(&format!("content_hash: {}\n", result.content_hash));
            out.push_str(&format!("duration_ms: {}\n", result.duration_ms));
            out
        }
        OutputFormat::Code => result.content.clone(),
    };

    if let Some(path) = output {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
    } else {
        print!("{content}");
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_content_is_stable_hex_sha256() {
        let h = hash_content("class Foo {}");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_content("class Foo {}"));
        assert_ne!(h, hash_content("class Bar {}"));
    }
}
