//! skypost - post to an AT Protocol PDS from the command line.
//!
//! Credentials come from the environment (or a `.env` file):
//! `SKYPOST_HANDLE`, `SKYPOST_APP_PASSWORD`, and optionally `SKYPOST_SERVER`.

use std::io;

use anyhow::{bail, Context, Result};
use skypost_core::{Agent, AgentConfig, Image, TracingLogger, Url};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "\
Usage:
  skypost post <text> [--image <url>]... [--alt <text>]...
  skypost whoami";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

struct PostArgs {
    text: String,
    images: Vec<Image>,
}

fn parse_post_args(args: &[String]) -> Result<PostArgs> {
    let mut text = None;
    let mut urls = Vec::new();
    let mut alts = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--image" => {
                let value = iter.next().context("--image needs a URL")?;
                urls.push(Url::parse(value).with_context(|| format!("Invalid image URL {}", value))?);
            }
            "--alt" => {
                alts.push(iter.next().context("--alt needs a value")?.clone());
            }
            other if text.is_none() => text = Some(other.to_string()),
            other => bail!("Unexpected argument {}\n{}", other, USAGE),
        }
    }

    let text = text.with_context(|| format!("Missing post text\n{}", USAGE))?;
    let images = urls
        .into_iter()
        .enumerate()
        .map(|(i, url)| Image::new(url, alts.get(i).cloned().unwrap_or_default()))
        .collect();

    Ok(PostArgs { text, images })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", USAGE);
    };

    let config = AgentConfig::from_env().context("Failed to load configuration")?;
    let agent = Agent::from_config(&config)
        .context("Failed to build XRPC client")?
        .with_logger(TracingLogger);

    match command.as_str() {
        "whoami" => {
            agent.connect().await.context("Failed to authenticate")?;
            let session = agent.session().await;
            if let Some(tokens) = session.tokens() {
                println!("{} ({})", tokens.handle, tokens.did);
            }
        }
        "post" => {
            let post = parse_post_args(&args[1..])?;
            info!(images = post.images.len(), "Posting");
            let record = agent
                .post_with_images(&post.text, &post.images)
                .await
                .context("Failed to post")?;
            println!("{}", record.uri);
        }
        other => bail!("Unknown command {}\n{}", other, USAGE),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_post_args_text_only() {
        let parsed = parse_post_args(&strings(&["hello"])).unwrap();
        assert_eq!(parsed.text, "hello");
        assert!(parsed.images.is_empty());
    }

    #[test]
    fn test_parse_post_args_images_pair_with_alts() {
        let parsed = parse_post_args(&strings(&[
            "--image",
            "https://example.com/a.png",
            "look",
            "--alt",
            "first",
            "--image",
            "https://example.com/b.png",
        ]))
        .unwrap();
        assert_eq!(parsed.text, "look");
        assert_eq!(parsed.images.len(), 2);
        assert_eq!(parsed.images[0].alt, "first");
        assert_eq!(parsed.images[1].alt, "");
    }

    #[test]
    fn test_parse_post_args_errors() {
        assert!(parse_post_args(&[]).is_err());
        assert!(parse_post_args(&strings(&["a", "b"])).is_err());
        assert!(parse_post_args(&strings(&["a", "--image", "not a url"])).is_err());
        assert!(parse_post_args(&strings(&["a", "--image"])).is_err());
    }
}
