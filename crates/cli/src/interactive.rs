//! Interactive session: pick a movie, refresh, read the five slots.
//!
//! The session keeps the current selection and the last results shown.
//! Changing the selection does not recompute anything until a refresh.

use anyhow::Result;
use colored::Colorize;
use data_loader::Catalog;
use recommender::{MovieRecommendation, RecommendationOrchestrator};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// What a line of user input asks for
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Select the movie at this row
    Select(usize),
    /// Recompute recommendations for the current selection
    Refresh,
    /// Print the selectable titles
    List,
    Quit,
    /// A list number outside 1..=len
    OutOfRange(usize),
    Unknown(String),
}

/// Interpret one input line
///
/// Order: single-letter commands, then an exact title, then a list number
/// (1-based). A title that looks like a number (e.g. "1917") wins over
/// the list number.
pub fn parse_input(line: &str, catalog: &Catalog) -> Action {
    let input = line.trim();
    match input {
        "" | "r" => return Action::Refresh,
        "l" => return Action::List,
        "q" | "quit" => return Action::Quit,
        _ => {}
    }

    if let Some(position) = catalog.position_of_title(input) {
        return Action::Select(position);
    }

    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= catalog.len() => Action::Select(n - 1),
        Ok(n) => Action::OutOfRange(n),
        Err(_) => Action::Unknown(input.to_string()),
    }
}

/// Session state between inputs
pub struct Session {
    orchestrator: RecommendationOrchestrator,
    selected: usize,
    shown: Vec<MovieRecommendation>,
}

impl Session {
    /// Start with the first movie selected, as a selection list would
    pub fn new(orchestrator: RecommendationOrchestrator) -> Self {
        Self {
            orchestrator,
            selected: 0,
            shown: Vec::new(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn shown(&self) -> &[MovieRecommendation] {
        &self.shown
    }

    pub fn select(&mut self, position: usize) {
        self.selected = position;
    }

    /// Recompute recommendations for the selected movie
    ///
    /// On error the previous results stay in place.
    pub async fn refresh(&mut self) -> Result<()> {
        let recommendations = self
            .orchestrator
            .recommend_for_position(self.selected)
            .await?;
        self.shown = recommendations;
        Ok(())
    }

    fn selected_title(&self) -> &str {
        self.orchestrator
            .catalog()
            .get_movie(self.selected)
            .map(|m| m.title.as_str())
            .unwrap_or("?")
    }

    fn render(&self) {
        println!();
        println!("{} {}", "Selected:".bold(), self.selected_title().cyan());
        if self.shown.is_empty() {
            println!("  (no recommendations yet)");
            return;
        }
        for (slot, rec) in self.shown.iter().enumerate() {
            println!("  [{}] {}", (slot + 1).to_string().green(), rec.title.bold());
            println!("      {}", rec.poster_url.dimmed());
        }
    }
}

fn print_help() {
    println!(
        "{}",
        "Enter a title or list number to select, r (or Enter) to show recommendations, l to list titles, q to quit."
            .dimmed()
    );
}

/// Run the session loop on stdin until `q` or end of input
pub async fn run(orchestrator: RecommendationOrchestrator) -> Result<()> {
    run_with_input(orchestrator, BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}

/// Run the session loop over any line source, returning the final session
pub async fn run_with_input<R>(orchestrator: RecommendationOrchestrator, input: R) -> Result<Session>
where
    R: AsyncBufRead + Unpin,
{
    let catalog = orchestrator.catalog().clone();
    let mut session = Session::new(orchestrator);

    println!("{}", "Movie Recommendation System".bold().blue());
    print_help();

    // Initial recommendations for the default selection
    if let Err(e) = session.refresh().await {
        println!("{} {}", "error:".red(), e);
    }
    session.render();

    // Split on raw bytes so one undecodable line does not end the session
    let mut lines = input.split(b'\n');
    loop {
        print!("\n{} ", ">".bold());
        std::io::stdout().flush()?;

        let Some(bytes) = lines.next_segment().await? else {
            break;
        };
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(e) => {
                println!("{} input is not valid UTF-8 ({})", "error:".red(), e.utf8_error());
                continue;
            }
        };

        match parse_input(&line, &catalog) {
            Action::Select(position) => {
                session.select(position);
                println!(
                    "Selected {} (press r to show recommendation)",
                    session.selected_title().cyan()
                );
            }
            Action::Refresh => {
                if let Err(e) = session.refresh().await {
                    println!("{} {}", "error:".red(), e);
                }
                session.render();
            }
            Action::List => crate::print_titles(&catalog),
            Action::Quit => break,
            Action::OutOfRange(n) => {
                println!(
                    "{} no movie number {} (the list runs 1 to {})",
                    "?".yellow(),
                    n,
                    catalog.len()
                );
            }
            Action::Unknown(input) => {
                println!("{} no movie titled {:?}", "?".yellow(), input);
                print_help();
            }
        }
    }

    Ok(session)
}
