use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Select};
use show_finder::{
    AppConfig, CatalogConfig, Controller, DEFAULT_BASE_URL, DEFAULT_MISSING_IMAGE_URL,
    DEFAULT_TIMEOUT_SECS, DispatchOutcome, EpisodesOutcome, Page, PageEvent, RequestOrdering,
    SearchOutcome, ShowCatalog, ShowFinderError, ShowId, page_controller,
};
use std::process;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Search the TVMaze catalog and browse episode lists
#[derive(Debug, Parser)]
#[command(name = "show-finder", version, about)]
struct Cli {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// How overlapping requests are resolved
    #[arg(long, env = "SHOW_FINDER_ORDERING", default_value_t = RequestOrdering::LastResponseWins)]
    ordering: RequestOrdering,

    /// Log catalog requests
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Base URL of the catalog API
    #[arg(long, env = "SHOW_FINDER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Image used for shows without a poster
    #[arg(long, env = "SHOW_FINDER_MISSING_IMAGE", default_value = DEFAULT_MISSING_IMAGE_URL)]
    missing_image: String,

    /// Request timeout in seconds
    #[arg(long, env = "SHOW_FINDER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for shows matching a query
    Search {
        query: String,
        /// Print the rendered page instead of a text listing
        #[arg(long)]
        html: bool,
    },
    /// List the episodes of a show
    Episodes {
        show_id: String,
        /// Print the rendered page instead of a text listing
        #[arg(long)]
        html: bool,
    },
    /// Search and browse episodes interactively
    Interactive,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Finder(#[from] ShowFinderError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            catalog: CatalogConfig {
                base_url: self.catalog.base_url.clone(),
                missing_image_url: self.catalog.missing_image.clone(),
                timeout_secs: self.catalog.timeout,
                ..CatalogConfig::default()
            },
            ordering: self.ordering,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "show_finder=debug"
    } else {
        "show_finder=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Prints the show grid as text, one block per card
fn print_shows(page: &Page) {
    let cards = page.show_cards();
    if cards.is_empty() {
        println!("No shows found.");
        return;
    }

    for card in cards {
        let field = |class: &str| {
            page.find_descendant(card, class)
                .map(|node| page.text_content(node))
                .unwrap_or_default()
        };
        let image = page
            .find_descendant(card, "card-img-top")
            .and_then(|node| page.attr(node, "src"))
            .unwrap_or_default();
        let id = page.show_id_for(card).map(String::from).unwrap_or_default();

        println!("[{}] {}", id, field("card-title"));
        let summary = nanohtml2text::html2text(&field("card-text"));
        if !summary.trim().is_empty() {
            println!("  {}", summary.trim());
        }
        println!("  Image: {}", image);
        println!();
    }
}

/// Prints the episode list if the panel is visible
fn print_episodes(page: &Page) {
    if !page.episodes_visible() {
        return;
    }
    let lines = page.episode_lines();
    println!("=== Episodes ===");
    if lines.is_empty() {
        println!("No episodes found.");
    }
    for line in lines {
        println!("  {}", line);
    }
}

fn print_page<C: ShowCatalog>(controller: &Controller<C, Page>, html: bool) {
    controller.with_view(|page| {
        if html {
            println!("{}", page.to_html());
        } else {
            print_shows(page);
            print_episodes(page);
        }
    });
}

async fn run_interactive<C: ShowCatalog>(controller: &Controller<C, Page>) -> Result<(), CliError> {
    loop {
        let query: String = Input::new()
            .with_prompt("Search shows (empty to quit)")
            .allow_empty(true)
            .interact_text()?;
        controller.with_view_mut(|page| page.set_query(&query));

        if controller.dispatch(PageEvent::Submit).await?
            == DispatchOutcome::Search(SearchOutcome::Skipped)
        {
            return Ok(());
        }
        controller.with_view(print_shows);

        loop {
            let (buttons, mut labels) = controller.with_view(|page| {
                let buttons = page.episode_buttons();
                let labels: Vec<String> = buttons
                    .iter()
                    .map(|&button| {
                        page.closest(button, show_finder::SHOW_CLASS)
                            .and_then(|card| page.find_descendant(card, "card-title"))
                            .map(|title| nanohtml2text::html2text(&page.text_content(title)))
                            .unwrap_or_default()
                    })
                    .collect();
                (buttons, labels)
            });
            if buttons.is_empty() {
                break;
            }
            labels.push("New search".to_string());

            let selection = Select::new()
                .with_prompt("Show episodes for")
                .items(&labels)
                .default(0)
                .interact()?;
            let Some(&button) = buttons.get(selection) else {
                break;
            };

            controller.dispatch(PageEvent::Click(button)).await?;
            controller.with_view(print_episodes);
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let controller = page_controller(&cli.app_config())?;

    match cli.command {
        Command::Search { query, html } => {
            if controller.handle_search(&query).await? == SearchOutcome::Skipped {
                println!("Nothing to search for.");
                return Ok(());
            }
            print_page(&controller, html);
        }
        Command::Episodes { show_id, html } => {
            let outcome = controller.handle_episodes(&ShowId::new(show_id)).await?;
            if let EpisodesOutcome::Rendered { .. } = outcome {
                print_page(&controller, html);
            }
        }
        Command::Interactive => run_interactive(&controller).await?,
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
