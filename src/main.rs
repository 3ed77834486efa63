use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use readmesmith::{
    github::GitHubClient,
    graphics::{BannerBuilder, BannerConfig},
    logging,
    orchestrator::{self, GenerateRequest, ReadmeService},
    output_store::{format_file_size, ReadmeStore},
    Config, OpenAIAgent, ReadmeError,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Generate README files for GitHub repositories", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for generated READMEs
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a README for a repository
    Generate {
        owner: String,
        repo: String,
        /// Skip the header and conclusion banners
        #[arg(long)]
        no_banner: bool,
        #[command(flatten)]
        banner: BannerArgs,
        /// Writing tone, e.g. professional or friendly
        #[arg(long)]
        tone: Option<String>,
    },
    /// Print banner URLs without generating a README
    Preview {
        owner: String,
        repo: String,
        #[command(flatten)]
        banner: BannerArgs,
    },
    /// List generated READMEs
    Files,
    /// Print a generated README
    Show { name: String },
    /// Delete a generated README
    Delete { name: String },
}

#[derive(Args)]
struct BannerArgs {
    /// Font key (jetbrains, fira, source, roboto, inter, poppins)
    #[arg(long)]
    font: Option<String>,
    /// Theme key (github_dark, midnight, cyberpunk, ...)
    #[arg(long)]
    theme: Option<String>,
    /// Header style (professional, animated, minimal)
    #[arg(long)]
    style: Option<String>,
    /// Title shown instead of the repository name
    #[arg(long)]
    title: Option<String>,
}

impl BannerArgs {
    fn into_config(self, include_banner: bool) -> BannerConfig {
        let defaults = BannerConfig::default();
        BannerConfig {
            include_banner,
            font: self.font.unwrap_or(defaults.font),
            theme: self.theme.unwrap_or(defaults.theme),
            style: self.style.unwrap_or(defaults.style),
            custom_title: self.title,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    config.validate().await?;

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("{} {}", "[ERROR]".bright_red(), e.to_string().bright_red());
        if e.downcast_ref::<ReadmeError>().is_some_and(ReadmeError::is_transient) {
            eprintln!("{}", "This looks temporary; try again in a moment.".yellow());
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Generate { owner, repo, no_banner, banner, tone } => {
            let service = ReadmeService::new(
                GitHubClient::new(config)?,
                Arc::new(OpenAIAgent::new(&config.llm)?),
                BannerBuilder::new(),
                ReadmeStore::new(&config.output_dir)?,
            );
            let request = GenerateRequest {
                owner,
                repo,
                banner_config: banner.into_config(!no_banner),
                tone,
            };

            let pb = create_progress_bar();
            pb.set_message(format!("Generating README for {}/{}", request.owner, request.repo));
            let result = service.generate(request).await;
            pb.finish_and_clear();
            let readme = result?;

            println!("{} {}", "[OK]".bright_green(), readme.file_path.bright_white().bold());
            println!(
                "  {} {} {} | {} files | branch {} | {:.2}s",
                "→".bright_blue(),
                readme.metadata.primary_language.bright_yellow(),
                readme.metadata.project_type.to_string().bright_yellow(),
                readme.files_analyzed,
                readme.branch_used,
                readme.processing_time_seconds
            );
        }
        Command::Preview { owner, repo, banner } => {
            let github = GitHubClient::new(config)?;
            let pb = create_progress_bar();
            pb.set_message(format!("Inspecting {}/{}", owner, repo));
            let result =
                orchestrator::preview_banners(&github, &BannerBuilder::new(), &owner, &repo, &banner.into_config(true))
                    .await;
            pb.finish_and_clear();
            let preview = result?;

            println!("{}", "Header banner:".bright_cyan().bold());
            println!("  {}", preview.header_banner_url);
            println!("{}", "Conclusion banner:".bright_cyan().bold());
            println!("  {}", preview.conclusion_banner_url);
            println!(
                "{} {} ({})",
                "Detected:".bright_cyan().bold(),
                preview.metadata.project_type,
                preview.metadata.tech_stack.join(", ")
            );
        }
        Command::Files => {
            let store = ReadmeStore::new(&config.output_dir)?;
            let files = store.list().await?;
            println!("\n{}", "📂 Generated READMEs:".bright_cyan().bold());
            if files.is_empty() {
                println!("  └─ {}", "(empty)".dimmed());
            }
            for (i, file) in files.iter().enumerate() {
                let prefix = if i + 1 == files.len() { "  └─ " } else { "  ├─ " };
                println!(
                    "{}{} ({}, {})",
                    prefix,
                    file.name.bright_white().bold(),
                    format_file_size(file.size).bright_black(),
                    file.created.format("%Y-%m-%d %H:%M").to_string().bright_black()
                );
            }
        }
        Command::Show { name } => {
            let store = ReadmeStore::new(&config.output_dir)?;
            println!("{}", store.read(&name).await?);
        }
        Command::Delete { name } => {
            let store = ReadmeStore::new(&config.output_dir)?;
            store.delete(&name).await?;
            info!("Deleted {}", name);
            println!("{} Deleted {}", "[OK]".bright_green(), name);
        }
    }
    Ok(())
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["-", "\\", "|", "/", "-", "\\", "|", "/"]);
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
