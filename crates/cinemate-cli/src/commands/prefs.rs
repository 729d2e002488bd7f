use super::App;
use crate::output::new_table;
use cinemate_core::resolve_genre;
use cinemate_models::{Preferences, ALL_GENRES};
use cinemate_sources::MetadataSource;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

#[derive(Debug, Default)]
pub struct PrefsUpdate {
    pub genre: Option<String>,
    pub min_rating: Option<f64>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
}

impl PrefsUpdate {
    fn is_empty(&self) -> bool {
        self.genre.is_none() && self.min_rating.is_none() && self.from_year.is_none() && self.to_year.is_none()
    }
}

pub fn run_show(app: &App) -> Result<()> {
    let prefs = app.library.preferences()?;
    print_prefs(app, &prefs);
    Ok(())
}

pub async fn run_set(app: &App, update: PrefsUpdate) -> Result<()> {
    if update.is_empty() {
        app.output.warn("Nothing to change. Use --genre, --min-rating, --from-year or --to-year");
        return Ok(());
    }

    let current = app.library.preferences()?;
    let mut prefs = apply_update(current, update)?;

    if !prefs.any_genre() {
        prefs.genre = canonical_genre(app, &prefs.genre).await;
    }

    app.library.save_preferences(&prefs)?;
    app.output.success("Preferences saved");
    print_prefs(app, &prefs);
    Ok(())
}

pub fn run_reset(app: &App) -> Result<()> {
    app.library.reset_preferences()?;
    app.output.success("Preferences reset to defaults");
    print_prefs(app, &Preferences::default());
    Ok(())
}

fn apply_update(mut prefs: Preferences, update: PrefsUpdate) -> Result<Preferences> {
    if let Some(genre) = update.genre {
        let genre = genre.trim();
        prefs.genre = if genre.is_empty() || genre.eq_ignore_ascii_case(ALL_GENRES) {
            ALL_GENRES.to_string()
        } else {
            genre.to_string()
        };
    }
    if let Some(min_rating) = update.min_rating {
        if !(0.0..=10.0).contains(&min_rating) {
            return Err(eyre!("Minimum rating must be between 0 and 10"));
        }
        prefs.min_rating = min_rating;
    }
    if let Some(from_year) = update.from_year {
        prefs.from_year = from_year;
    }
    if let Some(to_year) = update.to_year {
        prefs.to_year = to_year;
    }
    if prefs.from_year > prefs.to_year {
        return Err(eyre!("From year ({}) is after to year ({})", prefs.from_year, prefs.to_year));
    }
    Ok(prefs)
}

/// Spell the genre the way TMDB does when we can reach it; keep the input otherwise
async fn canonical_genre(app: &App, genre: &str) -> String {
    let Some(source) = app.try_source() else {
        return genre.to_string();
    };
    match source.genres().await {
        Ok(genres) => match resolve_genre(&genres, genre) {
            Some(found) => found.name.clone(),
            None => {
                app.output.warn(format!("\"{}\" is not a TMDB genre; no movies will match it", genre));
                genre.to_string()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Could not verify genre");
            genre.to_string()
        }
    }
}

fn print_prefs(app: &App, prefs: &Preferences) {
    if !app.output.is_human() {
        app.output.json(&json!({ "preferences": prefs }));
        return;
    }

    let mut table = new_table(["Preference", "Value"]);
    table.add_row(vec!["Genre".to_string(), prefs.genre.clone()]);
    table.add_row(vec!["Minimum rating".to_string(), format!("{:.1}", prefs.min_rating)]);
    table.add_row(vec!["From year".to_string(), prefs.from_year.to_string()]);
    table.add_row(vec!["To year".to_string(), prefs.to_year.to_string()]);
    app.output.table(&table);
}
