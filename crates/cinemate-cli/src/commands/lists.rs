use super::progress::with_spinner;
use super::App;
use crate::output::new_table;
use cinemate_core::{SavedIdList, ToggleOutcome};
use cinemate_models::{MovieDetails, MovieId};
use cinemate_sources::MetadataSource;
use color_eyre::Result;
use futures::future::join_all;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Watchlist,
    Watched,
}

impl ListKind {
    fn name(&self) -> &'static str {
        match self {
            ListKind::Watchlist => "watchlist",
            ListKind::Watched => "watched",
        }
    }

    fn list<'a>(&self, app: &'a App) -> &'a SavedIdList {
        match self {
            ListKind::Watchlist => app.library.watchlist(),
            ListKind::Watched => app.library.watched(),
        }
    }
}

pub async fn run_list(app: &App, kind: ListKind) -> Result<()> {
    let ids = kind.list(app).ids()?;

    if ids.is_empty() {
        if app.output.is_human() {
            app.output.info(format!("Your {} is empty", kind.name()));
        } else {
            app.output.json(&json!({ "list": kind.name(), "items": [] }));
        }
        return Ok(());
    }

    let details = match app.try_source() {
        Some(source) => {
            let lookups = join_all(ids.iter().map(|id| source.movie_details(*id)));
            with_spinner(format!("Loading {} movies...", ids.len()), &app.output, lookups).await
        }
        None => Vec::new(),
    };

    let rows: Vec<(MovieId, Option<MovieDetails>)> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let movie = match details.get(i) {
                Some(Ok(movie)) => Some(movie.clone()),
                Some(Err(e)) => {
                    tracing::warn!(movie_id = id, error = %e, "Failed to load movie for list");
                    None
                }
                None => None,
            };
            (*id, movie)
        })
        .collect();

    if !app.output.is_human() {
        let items: Vec<_> = rows
            .iter()
            .map(|(id, movie)| json!({ "id": id, "movie": movie.as_ref().map(MovieDetails::summary) }))
            .collect();
        app.output.json(&json!({ "list": kind.name(), "items": items }));
        return Ok(());
    }

    let mut table = new_table(["ID", "Title", "Year", "Rating"]);
    for (id, movie) in &rows {
        match movie {
            Some(movie) => table.add_row(vec![id.to_string(), movie.title.clone(), movie.year_label(), movie.rating_label()]),
            None => table.add_row(vec![id.to_string(), fallback_title(*id), String::new(), String::new()]),
        };
    }
    app.output.table(&table);
    Ok(())
}

pub async fn run_toggle(app: &App, kind: ListKind, id: MovieId) -> Result<()> {
    let title = match app.try_source() {
        Some(source) => match source.movie_details(id).await {
            Ok(movie) => movie.title,
            Err(e) => {
                tracing::warn!(movie_id = id, error = %e, "Could not fetch title, using fallback");
                fallback_title(id)
            }
        },
        None => fallback_title(id),
    };

    let outcome = match kind {
        ListKind::Watchlist => app.library.toggle_watchlist(id, &title)?,
        ListKind::Watched => app.library.toggle_watched(id, &title)?,
    };

    if app.output.is_human() {
        app.output.success(toggle_message(kind, outcome, &title));
    } else {
        app.output.json(&json!({
            "list": kind.name(),
            "id": id,
            "title": title,
            "outcome": outcome.to_string(),
        }));
    }
    Ok(())
}

fn fallback_title(id: MovieId) -> String {
    format!("Movie #{}", id)
}

fn toggle_message(kind: ListKind, outcome: ToggleOutcome, title: &str) -> String {
    match (kind, outcome) {
        (ListKind::Watchlist, ToggleOutcome::Added) => format!("Added \"{}\" to your watchlist", title),
        (ListKind::Watchlist, ToggleOutcome::Removed) => format!("Removed \"{}\" from your watchlist", title),
        (ListKind::Watched, ToggleOutcome::Added) => format!("Marked \"{}\" as watched", title),
        (ListKind::Watched, ToggleOutcome::Removed) => format!("Unmarked \"{}\" as watched", title),
    }
}
