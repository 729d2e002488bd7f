use super::progress::with_spinner;
use super::App;
use crate::output::{new_table, section_header};
use cinemate_core::{recommendations, resolve_genre};
use cinemate_models::{MovieId, MovieSummary, Provider, NOT_AVAILABLE};
use cinemate_sources::{DiscoverQuery, MetadataSource};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_search(app: &App, query: &str, limit: usize) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(eyre!("Search query cannot be empty"));
    }

    let source = app.source()?;
    let results = with_spinner(format!("Searching for \"{}\"...", query), &app.output, source.search_movies(query))
        .await
        .wrap_err_with(|| format!("Search for \"{}\" failed", query))?;
    app.library.track_search(query);

    let results: Vec<MovieSummary> = results.into_iter().take(limit).collect();
    if app.output.is_human() {
        if results.is_empty() {
            app.output.info(format!("No movies found for \"{}\"", query));
            return Ok(());
        }
        print_movie_table(app, &results)?;
    } else {
        app.output.json(&json!({ "query": query, "results": results }));
    }
    Ok(())
}

pub async fn run_suggest(app: &App, query: &str) -> Result<()> {
    let source = app.source()?;
    let suggestions = source.suggest(query).await.wrap_err("Failed to fetch suggestions")?;

    if app.output.is_human() {
        for movie in &suggestions {
            let tag = format!("#{}", movie.id);
            app.output.println(format!("{} ({})  {}", movie.display_title(), movie.year_label(), tag.bright_black()));
        }
    } else {
        app.output.json(&json!({ "query": query, "suggestions": suggestions }));
    }
    Ok(())
}

pub async fn run_details(app: &App, id: MovieId) -> Result<()> {
    let source = app.source()?;
    let movie = with_spinner("Loading movie details...", &app.output, source.movie_details_with_credits(id))
        .await
        .map_err(|e| {
            if e.is_not_found() {
                eyre!("No movie with id {}", id)
            } else {
                eyre!("Failed to load movie {}: {}", id, e)
            }
        })?;
    app.library.track_details_view(movie.id, &movie.title);

    let in_watchlist = app.library.watchlist().contains(movie.id)?;
    let watched = app.library.watched().contains(movie.id)?;
    let credits = movie.credits.clone().unwrap_or_default();
    let directors = credits.directors();
    let cast = credits.top_cast(5);
    let poster = movie.poster_url(&app.config.tmdb.image_base_url);

    if !app.output.is_human() {
        app.output.json(&json!({
            "movie": movie,
            "year": movie.year(),
            "posterUrl": poster,
            "directors": directors,
            "cast": cast,
            "inWatchlist": in_watchlist,
            "watched": watched,
        }));
        return Ok(());
    }

    section_header(&format!("{} ({})", movie.title, movie.year_label()), &app.output);
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        app.output.println(format!("{}", tagline.italic()));
    }

    let mut table = new_table(["Field", "Value"]);
    table.add_row(vec!["Rating".to_string(), movie.rating_label()]);
    table.add_row(vec!["Runtime".to_string(), movie.runtime_label()]);
    table.add_row(vec!["Genres".to_string(), movie.genres_label()]);
    table.add_row(vec!["Director".to_string(), join_or_na(&directors)]);
    table.add_row(vec!["Cast".to_string(), join_or_na(&cast)]);
    table.add_row(vec!["Poster".to_string(), poster]);
    table.add_row(vec!["Watchlist".to_string(), yes_no(in_watchlist)]);
    table.add_row(vec!["Watched".to_string(), yes_no(watched)]);
    app.output.table(&table);

    if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
        app.output.println("");
        app.output.println(overview);
    }
    Ok(())
}

pub async fn run_where(app: &App, id: MovieId, region: Option<String>) -> Result<()> {
    let source = app.source()?;
    let (movie, providers) = with_spinner(
        "Looking up streaming providers...",
        &app.output,
        futures::future::try_join(source.movie_details(id), source.watch_providers(id)),
    )
    .await
    .wrap_err_with(|| format!("Failed to load watch providers for movie {}", id))?;
    app.library.track_where_to_watch(movie.id, &movie.title);

    let requested = region.unwrap_or_else(|| app.config.tmdb.region.clone()).to_uppercase();
    let selected = providers.select_region(&requested).map(str::to_string);
    let regions = providers.regions();
    let logo_base = &app.config.tmdb.logo_base_url;

    if !app.output.is_human() {
        let offers = selected.as_deref().and_then(|code| providers.region(code));
        app.output.json(&json!({
            "movieId": movie.id,
            "title": movie.title,
            "requestedRegion": requested,
            "region": selected,
            "providers": offers,
            "availableRegions": regions,
        }));
        return Ok(());
    }

    section_header(&format!("Where to watch \"{}\"", movie.title), &app.output);
    let Some(code) = selected else {
        app.output.warn("No streaming information available for this movie");
        return Ok(());
    };
    if code != requested {
        app.output.warn(format!("Not available in {}; showing {} instead", requested, code));
    }

    let Some(offers) = providers.region(&code) else {
        return Ok(());
    };
    let mut table = new_table([format!("{} · Type", code), "Provider".to_string(), "Logo".to_string()]);
    for (kind, list) in [("Stream", &offers.flatrate), ("Rent", &offers.rent), ("Buy", &offers.buy)] {
        for provider in sorted_by_priority(list) {
            table.add_row(vec![
                kind.to_string(),
                provider.provider_name.clone(),
                provider.logo_url(logo_base).unwrap_or_default(),
            ]);
        }
    }
    if offers.is_empty() {
        app.output.info(format!("No providers listed for {}", code));
    } else {
        app.output.table(&table);
    }
    if let Some(link) = &offers.link {
        app.output.println(format!("More: {}", link.bright_blue()));
    }
    app.output.println(format!("Available regions: {}", regions.join(", ")));
    Ok(())
}

pub async fn run_genres(app: &App) -> Result<()> {
    let source = app.source()?;
    let genres = source.genres().await.wrap_err("Failed to load genres")?;

    if app.output.is_human() {
        let mut table = new_table(["ID", "Genre"]);
        for genre in &genres {
            table.add_row(vec![genre.id.to_string(), genre.name.clone()]);
        }
        app.output.table(&table);
    } else {
        app.output.json(&json!({ "genres": genres }));
    }
    Ok(())
}

pub async fn run_discover(app: &App, genre: &str, sort_by: String, min_votes: u32, limit: usize) -> Result<()> {
    let source = app.source()?;
    let genres = source.genres().await.wrap_err("Failed to load genres")?;
    let genre = resolve_genre(&genres, genre).ok_or_else(|| eyre!("Unknown genre \"{}\". Run 'cinemate genres' for the list", genre))?;

    let query = DiscoverQuery {
        sort_by,
        min_vote_count: Some(min_votes),
        ..DiscoverQuery::for_genre(genre.id)
    };
    let results = with_spinner(format!("Finding top {} movies...", genre.name), &app.output, source.discover(&query))
        .await
        .wrap_err_with(|| format!("Failed to discover {} movies", genre.name))?;
    let results: Vec<MovieSummary> = results.into_iter().take(limit).collect();

    if app.output.is_human() {
        section_header(&format!("Top {}", genre.name), &app.output);
        print_movie_table(app, &results)?;
    } else {
        app.output.json(&json!({ "genre": genre, "results": results }));
    }
    Ok(())
}

pub async fn run_for_you(app: &App) -> Result<()> {
    app.library.track_page_view("For You");

    let source = app.source()?;
    let prefs = app.library.preferences()?;
    let picks = with_spinner("Building recommendations...", &app.output, recommendations(&source, &prefs))
        .await
        .map_err(|_| eyre!("Failed to load recommendations. Please try again later"))?;

    if !app.output.is_human() {
        app.output.json(&json!({ "preferences": prefs, "results": picks }));
        return Ok(());
    }

    section_header("Recommended for you", &app.output);
    let filters = format!(
        "Genre: {} · Min rating: {:.1} · Years: {}-{}",
        prefs.genre, prefs.min_rating, prefs.from_year, prefs.to_year
    );
    app.output.println(filters.bright_black().to_string());
    if picks.is_empty() {
        app.output.info("No movies match your preferences. Try 'cinemate prefs set' to widen them");
        return Ok(());
    }

    let mut table = new_table(["ID", "Title", "Year", "Rating", "Genres"]);
    for pick in &picks {
        table.add_row(vec![
            pick.movie.id.to_string(),
            pick.movie.display_title().to_string(),
            pick.movie.year_label(),
            pick.movie.rating_label(),
            pick.genres.join(", "),
        ]);
    }
    app.output.table(&table);
    Ok(())
}

fn print_movie_table(app: &App, movies: &[MovieSummary]) -> Result<()> {
    let watchlist = app.library.watchlist().ids()?;
    let watched = app.library.watched().ids()?;

    let mut table = new_table(["ID", "Title", "Year", "Rating", ""]);
    for movie in movies {
        let mut marks = Vec::new();
        if watchlist.contains(&movie.id) {
            marks.push("★");
        }
        if watched.contains(&movie.id) {
            marks.push("✓");
        }
        table.add_row(vec![
            movie.id.to_string(),
            movie.display_title().to_string(),
            movie.year_label(),
            movie.rating_label(),
            marks.join(" "),
        ]);
    }
    app.output.table(&table);
    Ok(())
}

fn sorted_by_priority(providers: &[Provider]) -> Vec<&Provider> {
    let mut sorted: Vec<&Provider> = providers.iter().collect();
    sorted.sort_by_key(|p| p.display_priority.unwrap_or(u32::MAX));
    sorted
}

fn join_or_na(names: &[&str]) -> String {
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(", ")
    }
}

fn yes_no(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
