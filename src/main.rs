use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use docsite::config::{default_site_config_path, load_site_config, save_site_config};
use docsite::quick_index::QuickIndex;
use docsite::runnable::{assert_to_writeln, wrap_into_main, RunClient, RunnableExample};
use docsite::symbol_index::{SearchOutcome, SearchSession, SymbolIndex};
use docsite::utils::initial_query;

#[derive(Parser)]
#[command(name = "docsite", about = "Documentation site helpers", version)]
struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the symbol index
    Search {
        /// Symbol index file (JSON or generated symbols.js)
        #[arg(long)]
        index: PathBuf,
        /// Abbreviation budget for displayed names
        #[arg(long)]
        max_len: Option<usize>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Page URL whose `q` parameter seeds the query when none is given
        #[arg(long)]
        url: Option<String>,
        query: Vec<String>,
    },
    /// Print the "Jump to" index for the given symbol names
    Anchors { names: Vec<String> },
    /// Wrap a unittest body into a runnable program
    Wrap {
        #[arg(long)]
        module: String,
        /// Turn `assert(a == b);` into `writeln(a); // b`
        #[arg(long)]
        asserts: bool,
        file: PathBuf,
    },
    /// Send a program to the compile-and-run relay
    Run {
        file: PathBuf,
        #[arg(long)]
        stdin: Option<PathBuf>,
        #[arg(long, default_value = "")]
        args: String,
        /// Treat the file as a unittest body of this module
        #[arg(long)]
        module: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_site_config_path);
    let cfg = load_site_config(&config_path);

    match cli.command {
        Commands::Search {
            index,
            max_len,
            limit,
            json,
            url,
            query,
        } => {
            let index = SymbolIndex::load(&index)?;
            let mut options = cfg.search_options();
            if let Some(max_len) = max_len {
                options.abbreviation_max_len = max_len;
            }
            if let Some(limit) = limit {
                options.result_cap = limit;
            }

            let mut session = SearchSession::new(options);
            let text = match (query.is_empty(), url) {
                (true, Some(url)) => initial_query(&url),
                _ => query.join(" "),
            };
            let SearchOutcome::Ready(results) = session.search(&index, &text) else {
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }
            for hit in &results.hits {
                println!("{}\t{}", hit.display_name, hit.href(&cfg.search_root_dir));
            }
            if let Some(notice) = results.omitted_notice() {
                println!("{}", notice);
            }
        }
        Commands::Anchors { names } => {
            if cfg.inhibit_quick_index {
                return Ok(());
            }
            let mut quick_index = QuickIndex::new();
            for name in &names {
                quick_index.define(name);
            }
            println!("{}", quick_index.render_html());
        }
        Commands::Wrap {
            module,
            asserts,
            file,
        } => {
            if !cfg.runnable_policy().allows(&module) {
                return Err(format!("examples of {} are not runnable", module).into());
            }
            let mut code = std::fs::read_to_string(&file)?;
            if asserts {
                code = assert_to_writeln(&code);
            }
            println!("{}", wrap_into_main(&code, &module));
        }
        Commands::Run {
            file,
            stdin,
            args,
            module,
            endpoint,
            timeout,
        } => {
            if let Some(module) = &module {
                if !cfg.runnable_policy().allows(module) {
                    return Err(format!("examples of {} are not runnable", module).into());
                }
            }
            let code = std::fs::read_to_string(&file)?;
            let stdin = match stdin {
                Some(path) => std::fs::read_to_string(path)?,
                None => String::new(),
            };

            let mut example = match &module {
                Some(module) => {
                    RunnableExample::unittest(&code, module, cfg.default_output.as_deref())
                }
                None => RunnableExample::new(&code),
            }
            .with_stdin(&stdin)
            .with_args(&args);

            let endpoint = endpoint.unwrap_or_else(|| cfg.run_endpoint.clone());
            let client = RunClient::with_timeout(endpoint, Duration::from_secs(timeout))?;
            if let Some(panel) = example.run_with(&client).await {
                println!("{}", panel.title);
                println!("{}", panel.body);
            }
        }
        Commands::Config { init } => {
            println!("{}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            if init {
                save_site_config(&config_path, &cfg)?;
            }
        }
    }

    Ok(())
}
