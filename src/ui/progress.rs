use crate::document::ProcessingProgress;
use crate::ui::output::format_duration;
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

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Processing files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb
    }

    pub fn clear(&self) {
        if self.enabled {
            self.multi_progress.clear().ok();
        }
    }
}

// Helper functions for updating progress bars from aggregation events
pub fn update_file_progress(pb: &ProgressBar, progress: &ProcessingProgress) {
    pb.set_position(progress.files_processed as u64);

    if let Some(ref current_file) = progress.current_file {
        let eta = if progress.files_processed > 0 {
            let estimated_remaining = progress.estimated_remaining();
            if estimated_remaining.as_secs() > 0 {
                format!(" (ETA: {})", format_duration(estimated_remaining))
            } else {
                String::new()
            }
        } else {
            String::new()
        };

        let failed = if progress.errors.is_empty() {
            String::new()
        } else {
            format!(", {} failed", progress.errors.len())
        };

        pb.set_message(format!("Processing {}{}{}", current_file, eta, failed));
    } else {
        pb.set_message("Processing files...");
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_creation() {
        let manager = ProgressManager::new(true);

        let file_pb = manager.create_file_progress(100);
        let spinner = manager.create_spinner("Unpacking archive");

        // Visibility depends on whether a TTY is attached.
        assert!(file_pb.length().unwrap_or(0) > 0 || file_pb.length().is_none());
        assert!(!spinner.message().is_empty());
    }

    #[test]
    fn test_disabled_progress_bars() {
        let manager = ProgressManager::new(false);

        let file_pb = manager.create_file_progress(100);
        assert!(file_pb.is_hidden());

        let spinner = manager.create_spinner("test");
        assert!(spinner.is_hidden());
    }

    #[test]
    fn test_update_file_progress() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);

        let mut progress = ProcessingProgress::new(3);
        update_file_progress(&pb, &progress);
        assert_eq!(pb.position(), 0);
        assert_eq!(pb.message(), "Processing files...");

        progress.update_file("docs/guide.md".to_string());
        update_file_progress(&pb, &progress);
        assert_eq!(pb.position(), 1);
        assert!(pb.message().starts_with("Processing docs/guide.md"));

        progress.add_error("docs/guide.md: unreadable");
        update_file_progress(&pb, &progress);
        assert!(pb.message().ends_with(", 1 failed"));
    }
}
