use std::io::Write;

use mood_flow::{DetailRoute, ListRoute, LoadMore, MountOutcome, SearchCoordinator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::{app::App, render};

const HELP: &str = "\
Commands:
  search <mood>   find movies for a mood
  more            load the next page
  open <n>        show details for row n
  back            return to the list
  list            show the list again
  help            show this help
  quit            leave";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Search(String),
    More,
    Open(usize),
    Back,
    List,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse(line: &str) -> Input {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match command {
        "" => Input::Empty,
        "search" | "s" => Input::Search(rest.to_string()),
        "more" | "m" => Input::More,
        "open" | "o" => match rest.parse::<usize>() {
            Ok(n) if n > 0 => Input::Open(n),
            _ => Input::Unknown(line.to_string()),
        },
        "back" | "b" => Input::Back,
        "list" | "l" => Input::List,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

enum Screen {
    List,
    Detail(DetailRoute),
}

pub struct Shell {
    app: App,
    list: SearchCoordinator,
    screen: Screen,
    cursor: Option<usize>,
}

impl Shell {
    pub fn new(app: App) -> Self {
        let list = app.list_view();
        Self {
            app,
            list,
            screen: Screen::List,
            cursor: None,
        }
    }

    pub async fn run(mut self, mood: Option<String>) -> anyhow::Result<()> {
        let route = mood.map(ListRoute::for_mood).unwrap_or_else(ListRoute::home);
        self.mount(&route).await;
        println!("{}", HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("mood> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match parse(&line) {
                Input::Quit => break,
                Input::Empty => {}
                Input::Help => println!("{}", HELP),
                Input::Unknown(text) => println!("Unknown command `{}`. Type `help`.", text),
                Input::Search(mood) => self.search(&mood).await,
                Input::More => self.more().await,
                Input::Open(row) => self.open(row).await,
                Input::Back => self.back().await,
                Input::List => {
                    self.screen = Screen::List;
                    self.show_list();
                }
            }
        }
        Ok(())
    }

    fn show_list(&self) {
        let state = self.list.state();
        if state.movies.is_empty() {
            render::phase(&self.list.phase());
        } else {
            render::list(&state, 0, self.cursor);
        }
    }

    async fn mount(&mut self, route: &ListRoute) {
        match self.list.mount(route).await {
            Ok(MountOutcome::Restored { pending_scroll }) => {
                self.show_list();
                // only once the rows are on screen
                if let Some(pending) = pending_scroll {
                    pending.apply(|offset| self.cursor = Some(offset as usize));
                }
                if let Some(row) = self.cursor {
                    println!("Back at row {}.", row + 1);
                }
            }
            Ok(MountOutcome::Idle { suggested_mood }) => {
                if let Some(mood) = suggested_mood {
                    println!("Last time you were feeling \"{}\". Type `search {}` to pick up.", mood, mood);
                }
            }
            Ok(outcome) => {
                debug!(?outcome, "List mounted");
                self.show_list();
            }
            Err(e) => render::failure(&e),
        }
    }

    async fn search(&mut self, mood: &str) {
        self.screen = Screen::List;
        self.cursor = None;
        match self.list.submit(mood).await {
            Ok(()) => self.show_list(),
            Err(e) => render::failure(&e),
        }
    }

    async fn more(&mut self) {
        if !matches!(self.screen, Screen::List) {
            println!("Go `back` to the list first.");
            return;
        }
        let shown = self.list.state().movies.len();
        match self.list.load_more().await {
            Ok(LoadMore::Loaded { .. }) => render::list(&self.list.state(), shown, self.cursor),
            Ok(LoadMore::Skipped) => println!("No more results."),
            Err(e) => render::failure(&e),
        }
    }

    async fn open(&mut self, row: usize) {
        let state = self.list.state();
        let Some(movie) = state.movies.get(row - 1) else {
            println!("There is no row {}.", row);
            return;
        };

        let route = self.list.route().open(movie.id);
        if let Err(e) = self.list.snapshot((row - 1) as u64).await {
            render::failure(&e);
        }

        println!("{}", route);
        match self.app.detail_loader().open(&route).await {
            Ok(details) => render::details(&details, self.app.image_base_url()),
            Err(e) => render::failure(&e),
        }
        self.screen = Screen::Detail(route);
    }

    async fn back(&mut self) {
        let Screen::Detail(route) = std::mem::replace(&mut self.screen, Screen::List) else {
            self.show_list();
            return;
        };
        // like the browser, returning mounts a new list view
        self.list = self.app.list_view();
        self.cursor = None;
        self.mount(&route.back()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("search  rainy day "), Input::Search("rainy day".to_string()));
        assert_eq!(parse("m"), Input::More);
        assert_eq!(parse("open 3"), Input::Open(3));
        assert_eq!(parse("open 0"), Input::Unknown("open 0".to_string()));
        assert_eq!(parse("open x"), Input::Unknown("open x".to_string()));
        assert_eq!(parse("   "), Input::Empty);
        assert_eq!(parse("q"), Input::Quit);
        assert_eq!(parse("dance"), Input::Unknown("dance".to_string()));
    }
}
