use anyhow::Result;
use std::fmt::Write as _;
use std::sync::Arc;
use timbre_core::model::Recommendation;
use timbre_core::Dataset;
use timbre_etl::Config;
use timbre_search::{RecommendRequest, Recommender};

use super::{load_dataset, DatasetSource};

/// How many similarly spelled titles to suggest when a title is unknown.
const SUGGESTIONS: usize = 5;

pub fn run_recommend(
    config: &Config,
    source: &DatasetSource,
    title: &str,
    top_n: usize,
    json: bool,
) -> Result<()> {
    let dataset = load_dataset(config, source)?;
    let recommender = Recommender::new(Arc::new(dataset));

    let request = RecommendRequest::new(title).with_top_n(top_n);
    let response = recommender.query(&request);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !response.found {
        println!("No song titled \"{}\" in the catalog.", title);
        let suggestions = suggest_titles(recommender.dataset(), title);
        if !suggestions.is_empty() {
            println!("\nDid you mean:");
            for suggestion in suggestions {
                println!("  {}", suggestion);
            }
        }
        return Ok(());
    }

    if response.recommendations.is_empty() {
        println!(
            "No recommendations available for \"{}\": no other songs share its cluster.",
            title
        );
        return Ok(());
    }

    if let Some((_, song)) = recommender.dataset().find(title) {
        println!(
            "\nSongs similar to \"{}\" (cluster {}: {})\n",
            song.title, song.cluster_id, song.cluster_name
        );
    }
    print!("{}", format_table(&response.recommendations));

    Ok(())
}

/// Titles containing `title`, ignoring case.
fn suggest_titles<'a>(dataset: &'a Dataset, title: &str) -> Vec<&'a str> {
    let needle = title.to_lowercase();
    dataset
        .titles()
        .filter(|t| t.to_lowercase().contains(&needle))
        .take(SUGGESTIONS)
        .collect()
}

fn format_table(recommendations: &[Recommendation]) -> String {
    let title_width = column_width("Title", recommendations.iter().map(|r| r.title.as_str()));
    let artist_width = column_width("Artist", recommendations.iter().map(|r| r.artist.as_str()));

    let mut out = format!(
        "  {:>2}  {:>10}  {:<title_width$}  {:<artist_width$}  Genres\n",
        "#", "Similarity", "Title", "Artist"
    );
    for (rank, rec) in recommendations.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}  {:>10.4}  {:<title_width$}  {:<artist_width$}  {}",
            rank + 1,
            rec.similarity,
            rec.title,
            rec.artist,
            rec.genres
        );
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
