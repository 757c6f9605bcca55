use clap::{Parser, Subcommand};
use sitesmith::assemble::{AssemblyContext, assemble};
use sitesmith::config::{self, SiteConfig};
use sitesmith::generate::{ResponseFile, build_site, generate_site};
use sitesmith::output;
use sitesmith::parse::{generate_fallback_html, parse_output};
use sitesmith::store::{FsStore, ProjectStore, StoreError};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sitesmith")]
#[command(about = "Turn LLM site responses into servable HTML pages")]
#[command(long_about = "\
Turn LLM site responses into servable HTML pages

A model response is prose interleaved with fenced code blocks. Each block
becomes a project file; the tag on the opening fence names its language and
path:

  ```html:index.html               page (first HTML block, or index.html)
  ```html:partials/header.html     partial (every later HTML block)
  ```partial:nav.html              explicit partial
  ```page:about.html               explicit page
  ```css:styles.css                style, inlined into every page's <head>
  ```javascript:script.js          script, inlined before every </body>

Pages pull partials in with <!-- include:partials/header.html -->.

Project store layout:

  projects/
  └── my-project/
      ├── project.json             # name + description
      ├── files.json               # ordered index: path, language, type
      └── files/                   # raw file contents

Run 'sitesmith gen-config' to generate a documented sitesmith.toml.")]
#[command(version)]
struct Cli {
    /// Project store directory (overrides store_dir from the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log every file written
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a raw response and list the files it contains
    Parse {
        /// Response file, or '-' for stdin
        input: PathBuf,
        /// Print the parsed files as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a raw response into a project, falling back to a placeholder page
    Import {
        /// Project name
        project: String,
        /// Response file
        input: PathBuf,
        /// Site description, used as the fallback page text
        #[arg(long, default_value = "")]
        description: String,
        /// Job identifier shown in the fallback page title
        #[arg(long)]
        job_id: Option<String>,
    },
    /// List projects in the store
    Projects,
    /// List the files of a project
    Files {
        /// Project name
        project: String,
    },
    /// Assemble one page of a project into a self-contained document
    Assemble {
        /// Project name
        project: String,
        /// Page path within the project
        #[arg(default_value = "index.html")]
        page: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Assemble every page of a project into a directory
    Build {
        /// Project name
        project: String,
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print the fallback page for a description
    Fallback {
        /// Site description
        description: String,
        /// Job identifier shown in the page title
        #[arg(long, default_value = "local")]
        job_id: String,
    },
    /// Print a stock sitesmith.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse { input, json } => {
            let raw = read_input(&input)?;
            let parsed = parse_output(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                output::print_files(parsed.files());
            }
        }
        Command::Import {
            project,
            input,
            description,
            job_id,
        } => {
            let config = config::load_config(&cli.config)?;
            let mut store = open_store(cli.store.as_deref(), &config);
            let job_id = job_id.unwrap_or_else(|| project.clone());
            let report = generate_site(
                &ResponseFile::new(input),
                &mut store,
                &project,
                &description,
                &job_id,
            )?;
            output::print_generation_report(&report);
        }
        Command::Projects => {
            let config = config::load_config(&cli.config)?;
            let store = open_store(cli.store.as_deref(), &config);
            let projects = store
                .list_projects()?
                .iter()
                .map(|name| {
                    store
                        .get_project(name)?
                        .ok_or_else(|| StoreError::ProjectNotFound(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            output::print_projects(&projects);
        }
        Command::Files { project } => {
            let config = config::load_config(&cli.config)?;
            let store = open_store(cli.store.as_deref(), &config);
            output::print_files(&store.get_files(&project)?);
        }
        Command::Assemble {
            project,
            page,
            output: out_file,
        } => {
            let config = config::load_config(&cli.config)?;
            let store = open_store(cli.store.as_deref(), &config);
            let files = store.get_files(&project)?;
            let ctx = AssemblyContext::new(&page, &files)
                .with_project(&project)
                .with_route_prefix(&config.route_prefix)
                .with_metadata(&config.metadata);
            let html = assemble(&ctx)?;
            match out_file {
                Some(path) => std::fs::write(path, html)?,
                None => print!("{}", html),
            }
        }
        Command::Build {
            project,
            output: out_dir,
        } => {
            let config = config::load_config(&cli.config)?;
            let store = open_store(cli.store.as_deref(), &config);
            println!("==> Building {} → {}", project, out_dir.display());
            let report = build_site(&store, &project, &config, &out_dir)?;
            output::print_build_report(&report);
        }
        Command::Fallback {
            description,
            job_id,
        } => {
            println!("{}", generate_fallback_html(&description, &job_id));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// `--store` wins over the configured store directory.
fn open_store(cli_store: Option<&Path>, config: &SiteConfig) -> FsStore {
    match cli_store {
        Some(path) => FsStore::new(path),
        None => FsStore::new(&config.store_dir),
    }
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
}
