use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the events of a recording.
pub fn create_event_progress_bar(total: u64, message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Progress bar that draws nothing, for quiet runs.
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

pub fn finish_with_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("❌ {}", message));
}
