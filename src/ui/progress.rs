use crate::extractor::AggregationProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_video_progress(&self, total_videos: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_videos));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} videos {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Aggregating...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

}

pub fn update_video_progress(pb: &ProgressBar, progress: &AggregationProgress) {
    pb.set_position(progress.videos_processed as u64);

    if let Some(ref video) = progress.current_video {
        pb.set_message(truncate_label(video, 40));
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    pb.finish_with_message(format!("{} (took {:.1}s)", message, duration.as_secs_f64()));
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }

    let kept: String = label.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_is_hidden() {
        let manager = ProgressManager::new(false);

        let pb = manager.create_video_progress(10);
        assert!(pb.is_hidden());
        assert_eq!(manager.suspend(|| 42), 42);
    }

    #[test]
    fn test_update_video_progress() {
        let pb = ProgressBar::hidden();
        pb.set_length(4);

        let mut progress = AggregationProgress::new(4);
        progress.start_video("VID1");
        progress.finish_video();
        update_video_progress(&pb, &progress);

        assert_eq!(pb.position(), 1);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("VID1", 10), "VID1");
        assert_eq!(truncate_label("a-very-long-video-folder-name", 10), "a-very-...");
    }
}
