use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mdsite::Config;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Generate a static HTML site from Markdown")]
struct Cli {
    /// Config file
    #[arg(short, long, global = true, default_value = "mdsite.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy static assets and generate a page for every Markdown file
    Build {
        /// Directory of Markdown content
        #[arg(long)]
        content: Option<PathBuf>,

        /// Directory of static assets copied verbatim
        #[arg(long = "static")]
        static_dir: Option<PathBuf>,

        /// Output directory (deleted and recreated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// HTML template with {{ Title }} and {{ Content }} placeholders
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Convert a single Markdown file to an HTML fragment
    Render {
        /// Input Markdown file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Command::Build {
            content,
            static_dir,
            output,
            template,
        } => {
            let site = &mut config.site;
            if let Some(content) = content {
                site.content_dir = content;
            }
            if let Some(static_dir) = static_dir {
                site.static_dir = static_dir;
            }
            if let Some(output) = output {
                site.output_dir = output;
            }
            if let Some(template) = template {
                site.template = template;
            }

            let pages = mdsite::site::build_site(&config.site, &config.render)
                .context("site build failed")?;
            log::info!(
                "Generated {} page(s) in {}",
                pages.len(),
                config.site.output_dir.display()
            );
        }
        Command::Render { input, output } => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let html = mdsite::markdown_to_html_with(&markdown, &config.render)
                .with_context(|| format!("converting {}", input.display()))?;

            match output {
                Some(output) => {
                    fs::write(&output, html)
                        .with_context(|| format!("writing {}", output.display()))?;
                    log::info!("Created {}", output.display());
                }
                None => println!("{}", html),
            }
        }
    }

    Ok(())
}
