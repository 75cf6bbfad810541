use std::fmt::Write as _;

use anyhow::Result;
use timbre_core::ClusterSummary;
use timbre_etl::Config;

use super::{load_dataset, DatasetSource};

const BAR_WIDTH: usize = 30;

pub fn show_clusters(config: &Config) -> Result<()> {
    let dataset = load_dataset(config, &DatasetSource::Database)?;
    let summaries = dataset.cluster_summaries();

    if summaries.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    println!("\n🎵 Cluster Distribution\n");
    print!("{}", format_distribution(&summaries, dataset.len()));
    println!("\n  {} songs in {} clusters", dataset.len(), summaries.len());

    Ok(())
}

fn format_distribution(summaries: &[ClusterSummary], total: usize) -> String {
    let name_width = summaries
        .iter()
        .map(|s| s.cluster_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    let largest = summaries.iter().map(|s| s.song_count).max().unwrap_or(0);

    let mut out = format!(
        "  {:>7}  {:<name_width$}  {:>6}  {:>6}\n",
        "Cluster", "Name", "Songs", "Share"
    );
    for summary in summaries {
        let share = if total == 0 {
            0.0
        } else {
            summary.song_count as f64 * 100.0 / total as f64
        };
        let _ = writeln!(
            out,
            "  {:>7}  {:<name_width$}  {:>6}  {:>5.1}%  {}",
            summary.cluster_id,
            summary.cluster_name,
            summary.song_count,
            share,
            bar(summary.song_count, largest)
        );
    }
    out
}

/// A bar of `#` scaled so the largest cluster fills `BAR_WIDTH`.
fn bar(count: usize, largest: usize) -> String {
    if largest == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(largest);
    "#".repeat(len)
}
