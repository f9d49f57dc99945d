//! Interactive exploration session over stdin.

use crate::render;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;
use trailure_error::{Error, Result};
use trailure_explore::Explorer;
use trailure_gateway::CompletionProvider;

pub const HELP: &str = "\
Commands:
  search <destination>   Find experiences for a destination
  quick [n]              List quick destinations, or search number n
  filter <category>      Show one category (\"All\" for everything)
  open <n>               Open card n
  close                  Close the open card
  tailor <profile>       Choose a traveler profile on the open card
  refine                 Find options for the chosen profile
  retry                  Repeat the last search
  state                  Dump the current state as JSON
  help                   Show this help
  quit                   Leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    /// 1-based quick destination, or `None` to list them
    Quick(Option<usize>),
    Filter(String),
    /// 1-based card number
    Open(usize),
    Close,
    Tailor(String),
    Refine,
    Retry,
    State,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. A line that is not a known command is taken
    /// as a destination to search for.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Err(Error::invalid_argument("empty command")),
            "search" | "s" => {
                if rest.is_empty() {
                    return Err(Error::invalid_argument("search needs a destination"));
                }
                Command::Search(rest.to_string())
            }
            "quick" if rest.is_empty() => Command::Quick(None),
            "quick" => Command::Quick(Some(parse_number(rest)?)),
            "filter" | "f" => {
                if rest.is_empty() {
                    return Err(Error::invalid_argument("filter needs a category"));
                }
                Command::Filter(rest.to_string())
            }
            "open" | "o" => Command::Open(parse_number(rest)?),
            "close" | "back" => Command::Close,
            "tailor" | "t" => {
                if rest.is_empty() {
                    return Err(Error::invalid_argument("tailor needs a profile"));
                }
                Command::Tailor(rest.to_string())
            }
            "refine" | "r" => Command::Refine,
            "retry" => Command::Retry,
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Search(line.to_string()),
        };
        Ok(command)
    }
}

fn parse_number(text: &str) -> Result<usize> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::invalid_argument(format!(
            "expected a number starting at 1, got {:?}",
            text
        ))),
    }
}

/// Run the session until `quit` or end of input.
pub async fn run<P: CompletionProvider>(explorer: &mut Explorer<P>, quiet: bool) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !quiet {
        stdout.write_all(render::view(explorer.state()).as_bytes()).await?;
        stdout.write_all(b"\nType `help` for commands.\n").await?;
    }

    loop {
        stdout.write_all(b"\ntrailure> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                stdout.write_all(format!("{}\n", e.message()).as_bytes()).await?;
                continue;
            }
        };
        debug!(?command, "repl command");

        if command == Command::Quit {
            break;
        }
        let output = match execute(explorer, command).await {
            Ok(output) => output,
            Err(e) => format!("{}\n", e.message()),
        };
        stdout.write_all(output.as_bytes()).await?;
    }
    Ok(())
}

/// Apply one command and return what to print.
async fn execute<P: CompletionProvider>(
    explorer: &mut Explorer<P>,
    command: Command,
) -> Result<String> {
    match command {
        Command::Search(text) => explorer.search(&text).await,
        Command::Quick(None) => return Ok(render::quick_destinations()),
        Command::Quick(Some(n)) => explorer.search_quick(n - 1).await?,
        Command::Filter(category) => explorer.filter_by_category(&category),
        Command::Open(n) => explorer.select_card(n - 1)?,
        Command::Close => explorer.close_detail(),
        Command::Tailor(label) => explorer.choose_tailor(&label)?,
        Command::Refine => {
            if explorer.state().detail.is_none() {
                return Err(Error::invalid_argument("open a card first"));
            }
            explorer.refine().await
        }
        Command::Retry => explorer.retry().await,
        Command::State => {
            let json = serde_json::to_string_pretty(explorer.state()).map_err(|e| {
                Error::unexpected("failed to serialize state").set_source(e)
            })?;
            return Ok(format!("{}\n", json));
        }
        Command::Help => return Ok(format!("{}\n", HELP)),
        Command::Quit => return Ok(String::new()),
    }

    let state = explorer.state();
    Ok(match &state.detail {
        Some(detail) => render::detail(detail),
        None => render::view(state),
    })
}
