use anyhow::Result;
use timbre_core::Dataset;
use timbre_etl::Config;

use super::{load_dataset, DatasetSource};

pub fn list_songs(config: &Config, filter: Option<String>, limit: usize) -> Result<()> {
    let dataset = load_dataset(config, &DatasetSource::Database)?;
    let (shown, total) = matching_titles(&dataset, filter.as_deref(), limit);

    if total == 0 {
        match filter {
            Some(filter) => println!("No titles contain \"{}\".", filter),
            None => println!("The catalog is empty."),
        }
        return Ok(());
    }

    for title in &shown {
        println!("{}", title);
    }
    if total > shown.len() {
        println!("\n… {} more (use --limit to show more)", total - shown.len());
    }

    Ok(())
}

/// Up to `limit` distinct titles matching `filter`, plus the total number
/// of matches.
fn matching_titles<'a>(
    dataset: &'a Dataset,
    filter: Option<&str>,
    limit: usize,
) -> (Vec<&'a str>, usize) {
    let needle = filter.map(str::to_lowercase);
    let mut shown = Vec::new();
    let mut total = 0;

    for title in dataset.titles() {
        let matches = needle
            .as_deref()
            .map_or(true, |n| title.to_lowercase().contains(n));
        if matches {
            total += 1;
            if shown.len() < limit {
                shown.push(title);
            }
        }
    }

    (shown, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use timbre_core::model::{ClusterId, FeatureVector, SongId, SongRecord};

    fn dataset() -> Dataset {
        let titles = ["Alpha", "Beta", "alphabet soup", "Gamma", "Alpha"];
        let songs = titles
            .iter()
            .enumerate()
            .map(|(i, t)| SongRecord::new(SongId::from_position(i), *t, ClusterId::new(1)))
            .collect();
        let vectors = vec![FeatureVector::new(vec![1.0]); titles.len()];
        Dataset::from_aligned(songs, vectors).unwrap()
    }

    #[test]
    fn test_unfiltered_titles_are_distinct() {
        let ds = dataset();
        let (shown, total) = matching_titles(&ds, None, 10);
        assert_eq!(shown, vec!["Alpha", "Beta", "alphabet soup", "Gamma"]);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let ds = dataset();
        let (shown, total) = matching_titles(&ds, Some("ALPHA"), 10);
        assert_eq!(shown, vec!["Alpha", "alphabet soup"]);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_limit_counts_hidden_matches() {
        let ds = dataset();
        let (shown, total) = matching_titles(&ds, None, 1);
        assert_eq!(shown, vec!["Alpha"]);
        assert_eq!(total, 4);
    }
}
