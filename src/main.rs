use chapterbook::registry::{self, Registry};
use chapterbook::{config, generate, output, serve};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "chapterbook")]
#[command(about = "Static site generator and preview server for chapter-based courses")]
#[command(long_about = "\
Static site generator and preview server for chapter-based courses

A course is an ordered list of chapters defined in chapters.toml. Each
chapter's content is a Markdown file found by its id prefix; chapters without
a file yet render a \"content pending\" page.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── chapters.toml                # Chapter registry (optional, stock course otherwise)
  ├── chapters/                    # One content file per chapter
  │   ├── ch01-why-typescript.mdx  # Matches chapter id \"ch01\"
  │   └── ch02-how-it-works.md     # ch02; never matched by \"ch0\" or \"ch2\"
  └── assets/                      # Copied to the output as assets/

Content files may start with a YAML frontmatter block, use GitHub-flavored
Markdown, set heading ids with {#id}, and embed widgets:

  <Mermaid chart={`graph TD; A --> B`} />
  <CodePlayground language=\"typescript\" initialCode={`let x = 1;`} />

or as fenced blocks with the language `mermaid` or `playground`.

Run 'chapterbook gen-config' to generate a documented config.toml and
'chapterbook gen-chapters' for a registry to start from.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the whole site into the output directory
    Build,
    /// Resolve and compile every chapter without writing anything
    Check,
    /// Serve the site locally, compiling content on every request
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// List the chapters of the course
    Chapters {
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the stock chapters.toml
    GenChapters,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chapterbook=info,tower_http=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = generate::generate(&cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&cli.source)?;
            output::print_check_output(&report);
            let failures = report.failures();
            if failures > 0 {
                return Err(format!("{failures} chapter(s) failed to compile").into());
            }
            println!("==> Content is valid");
        }
        Command::Serve { port, host } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve::serve(&cli.source, &host, port))?;
        }
        Command::Chapters { json } => {
            let registry = Registry::load(&cli.source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(registry.chapters())?);
            } else {
                output::print_chapters(&registry);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenChapters => {
            print!("{}", registry::stock_registry_toml());
        }
    }

    Ok(())
}
