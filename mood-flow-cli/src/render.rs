use mood_flow::{FlowError, ListPhase, ListState, MovieDetails, Recovery, details::profile_url};

const OVERVIEW_WIDTH: usize = 96;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

/// Print rows `from..` of the list. `cursor` marks the selected row.
pub fn list(state: &ListState, from: usize, cursor: Option<usize>) {
    if from == 0 {
        println!(
            "\nMovies for \"{}\" (page {} of {})",
            state.mood, state.current_page, state.total_pages
        );
    }
    for (index, movie) in state.movies.iter().enumerate().skip(from) {
        let marker = if cursor == Some(index) { '>' } else { ' ' };
        println!(
            "{} {:>3}. {} ★ {:.1}",
            marker,
            index + 1,
            movie.title,
            movie.rating
        );
        if !movie.overview.is_empty() {
            println!("        {}", truncate(&movie.overview, OVERVIEW_WIDTH));
        }
    }
    if state.has_more() {
        println!("  -- {} shown, type `more` to load page {} --", state.movies.len(), state.current_page + 1);
    } else if !state.movies.is_empty() {
        println!("  -- end of results ({} movies) --", state.movies.len());
    }
}

pub fn details(movie: &MovieDetails, image_base_url: &str) {
    println!("\n{} ★ {:.1} ({} votes)", movie.title, movie.rating, movie.vote_count);

    let mut facts = Vec::new();
    if !movie.release_date.is_empty() {
        facts.push(movie.release_date.clone());
    }
    if movie.runtime > 0 {
        facts.push(format!("{} min", movie.runtime));
    }
    if let Some(rating) = &movie.content_rating {
        facts.push(rating.clone());
    }
    if !facts.is_empty() {
        println!("{}", facts.join(" • "));
    }
    if !movie.genres.is_empty() {
        println!("Genres: {}", movie.genres.join(", "));
    }
    if let Some(director) = &movie.director {
        println!("Directed by {}", director.name);
    }
    if !movie.writers.is_empty() {
        let writers: Vec<String> = movie
            .writers
            .iter()
            .map(|w| format!("{} ({})", w.name, w.job))
            .collect();
        println!("Written by {}", writers.join(", "));
    }
    if let Some(poster) = &movie.poster_path {
        println!("Poster: {}", poster);
    }
    if let Some(trailer) = movie.trailer.as_ref().or(movie.teaser.as_ref()) {
        println!("{}: {}", trailer.name, trailer.watch_url());
    }

    if !movie.overview.is_empty() {
        println!("\n{}", movie.overview);
    }

    if !movie.cast.is_empty() {
        println!("\nCast:");
        for actor in &movie.cast {
            print!("  {} as {}", actor.name, actor.character);
            if let Some(path) = &actor.profile_path {
                print!("  [{}]", profile_url(image_base_url, path));
            }
            println!();
            for notable in actor.notable_movies.iter().take(3) {
                println!(
                    "      {} ({}) ★ {:.1}",
                    notable.title,
                    notable.release_year().unwrap_or("?"),
                    notable.rating
                );
            }
        }
    }

    if !movie.similar_movies.is_empty() {
        println!("\nSimilar:");
        for similar in &movie.similar_movies {
            println!("  {} ★ {:.1}", similar.title, similar.rating);
        }
    }
}

pub fn phase(phase: &ListPhase) {
    match phase {
        ListPhase::Idle => println!("Type `search <mood>` to get started."),
        ListPhase::Searching { page } => println!("Loading page {}...", page),
        ListPhase::Ready { .. } => {}
        ListPhase::Failed { message } => eprintln!("! {}", message),
    }
}

/// The view-boundary rendering of any failure: one message plus what to do next.
pub fn failure(err: &FlowError) {
    eprintln!("! {}", err.user_message());
    eprintln!("  {}", hint(err));
}

fn hint(err: &FlowError) -> String {
    let hint = match err.recovery() {
        Recovery::EditInput => "Try a different mood.",
        Recovery::Reload => "Try again in a moment.",
        Recovery::GoHome => "Nothing to show here. Type `back` or search again.",
    };
    match err.status() {
        Some(status) => format!("{} (HTTP {})", hint, status),
        None => hint.to_string(),
    }
}
