//! Training progress chart
//!
//! Drawing needs the `charts` feature. Without it `plot_training_progress`
//! returns an error, which callers treat as a warning.

use anyhow::Result;
use std::path::Path;

use super::training_stats::TrainingStats;

#[cfg(feature = "charts")]
pub fn plot_training_progress(stats: &TrainingStats, path: &Path) -> Result<()> {
    use plotters::prelude::*;

    let scores = stats.scores();
    let sizes = stats.table_sizes();
    let episodes = scores.len().max(1);
    let window = stats.window_size();

    let root = SVGBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(400);

    let max_score = scores.iter().copied().max().unwrap_or(0).max(1) as f64;
    let mut score_chart = ChartBuilder::on(&upper)
        .caption("Training Scores Progress", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0..episodes, 0f64..max_score * 1.1)?;

    score_chart
        .configure_mesh()
        .x_desc("Game Number")
        .y_desc("Score")
        .draw()?;

    score_chart
        .draw_series(LineSeries::new(
            scores.iter().enumerate().map(|(i, &s)| (i, s as f64)),
            BLUE.mix(0.3).stroke_width(1),
        ))?
        .label("Game Scores")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.mix(0.3).stroke_width(1)));

    score_chart
        .draw_series(LineSeries::new(
            stats
                .average_scores()
                .iter()
                .enumerate()
                .map(|(i, &avg)| (i * window, avg)),
            RED.stroke_width(2),
        ))?
        .label(format!("Average ({} games)", window))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    score_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    let max_size = sizes.iter().copied().max().unwrap_or(0).max(1);
    let mut size_chart = ChartBuilder::on(&lower)
        .caption("Q-table Growth", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0..episodes, 0..max_size + max_size / 10 + 1)?;

    size_chart
        .configure_mesh()
        .x_desc("Game Number")
        .y_desc("Number of States")
        .draw()?;

    size_chart
        .draw_series(LineSeries::new(
            sizes.iter().enumerate().map(|(i, &n)| (i, n)),
            GREEN.stroke_width(2),
        ))?
        .label("Q-table Size")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(2)));

    size_chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(not(feature = "charts"))]
pub fn plot_training_progress(_stats: &TrainingStats, _path: &Path) -> Result<()> {
    anyhow::bail!("chart support not compiled in (rebuild with `--features charts`)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_stats() -> TrainingStats {
        let mut stats = TrainingStats::new(10);
        for i in 0..35u32 {
            stats.record_episode(i % 7, 10 + i as usize, 0.5);
        }
        stats
    }

    #[cfg(feature = "charts")]
    #[test]
    fn test_chart_written() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("progress.svg");

        plot_training_progress(&sample_stats(), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[cfg(not(feature = "charts"))]
    #[test]
    fn test_chart_unavailable_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("progress.svg");

        assert!(plot_training_progress(&sample_stats(), &path).is_err());
        assert!(!path.exists());
    }
}
