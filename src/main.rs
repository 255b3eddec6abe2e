use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use show_scout::{
    ClickTarget, ClientConfig, DEFAULT_API_BASE, Page, ProgressEvent, SearchSubmit, ShowDirectory,
    ShowId, ShowScoutError, ShowWidget, TvMazeProvider, render_text,
};
use std::process;

/// Search the TVMaze directory for TV shows and browse their episodes.
///
/// Without arguments an interactive session is started. Passing a search term
/// or `--episodes` prints a single result page and exits.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Search term to look up once, non-interactively
    term: Option<String>,

    /// Print the episode list of the show with this TVMaze id
    #[arg(long, value_name = "SHOW_ID", conflicts_with = "term")]
    episodes: Option<u64>,

    /// Base URL of the TVMaze API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Do not print progress messages
    #[arg(short, long)]
    quiet: bool,
}

/// Handles progress events and prints formatted output
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::SearchStarted { term } => {
            println!("Searching shows for '{}'...", term);
        }
        ProgressEvent::ShowsFound { count } => {
            println!("Found {} show(s)\n", count);
        }
        ProgressEvent::FetchingEpisodes { show_id } => {
            println!("Fetching episodes of show #{}...", show_id);
        }
        ProgressEvent::EpisodesFound { show_id, count } => {
            println!("Found {} episode(s) for show #{}\n", count, show_id);
        }
        ProgressEvent::StaleResponseDiscarded { ticket } => {
            println!("Ignoring outdated response #{}", ticket.sequence());
        }
        ProgressEvent::RequestFailed { message } => {
            eprintln!("Request failed: {}", message);
        }
    }
}

/// Runs the interactive search session until the user quits
fn interactive<D, F>(widget: &mut ShowWidget<D, F>) -> Result<(), ShowScoutError>
where
    D: ShowDirectory,
    F: FnMut(ProgressEvent),
{
    let theme = ColorfulTheme::default();

    loop {
        let term: String = Input::with_theme(&theme)
            .with_prompt("Search for a show")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| ShowScoutError::Prompt(e.to_string()))?;

        widget.page_mut().search_form.term = term;

        // Failures are reported through the progress callback; the page stays as it was
        if widget.on_search_submit(&mut SearchSubmit::new()).is_err() {
            continue;
        }
        print!("{}", render_text(widget.page()));

        loop {
            let mut options: Vec<String> = widget
                .page()
                .shows_list
                .items
                .iter()
                .map(|card| format!("Episodes: {}", card.name))
                .collect();
            let new_search = options.len();
            options.push("New search".to_string());
            options.push("Quit".to_string());

            let selection = Select::with_theme(&theme)
                .with_prompt("Choose an action")
                .items(&options)
                .default(new_search)
                .interact_opt()
                .map_err(|e| ShowScoutError::Prompt(e.to_string()))?;

            match selection {
                Some(index) if index < new_search => {
                    let outcome = widget.on_click(&ClickTarget::episodes_button(index));
                    print_outcome(widget, outcome)?;
                }
                Some(index) if index == new_search + 1 => return Ok(()),
                _ => break,
            }
        }
    }
}

/// Prints the page after a handler ran
///
/// Directory failures were already reported through the progress callback
/// and leave the page unchanged, so they are not treated as fatal.
fn print_outcome<D, F>(
    widget: &ShowWidget<D, F>,
    outcome: Result<bool, ShowScoutError>,
) -> Result<(), ShowScoutError>
where
    D: ShowDirectory,
    F: FnMut(ProgressEvent),
{
    match outcome {
        Ok(_) => {
            print!("{}", render_text(widget.page()));
            Ok(())
        }
        Err(ShowScoutError::MetadataRetrieval(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

fn run(cli: Cli) -> Result<(), ShowScoutError> {
    let config = ClientConfig {
        api_base: cli.api_base,
        timeout_secs: cli.timeout,
    };
    let provider = TvMazeProvider::with_config(&config)?;

    // Failures are printed even when quiet
    let quiet = cli.quiet;
    let mut widget = ShowWidget::new(Page::new(), provider, move |event| {
        if !quiet || event.is_failure() {
            handle_progress_event(event);
        }
    });

    if let Some(id) = cli.episodes {
        let outcome = widget.show_episodes(ShowId(id));
        return print_outcome(&widget, outcome);
    }

    if let Some(term) = cli.term {
        widget.page_mut().search_form.term = term;
        let outcome = widget.on_search_submit(&mut SearchSubmit::new());
        return print_outcome(&widget, outcome);
    }

    interactive(&mut widget)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
