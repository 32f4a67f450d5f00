use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

const SPINNER_TEMPLATE: &str = "  {msg} {spinner}";
const BAR_TEMPLATE: &str = "  {msg} [{bar:30}] {pos}/{len} {prefix:.dim}";

/// Progress tracking for the three inventory phases
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_phase_1() -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(bright_yellow("Phase 1/3: Listing projects").to_string());
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self, project_count: usize) -> Self {
        self.pb.finish_with_message(
            bright_green(format!("Phase 1/3: Listed {project_count} projects ✓")).to_string(),
        );
        let pb = create_bar(
            project_count as u64,
            bright_yellow("Phase 2/3: Enriching projects").to_string(),
        );
        Self { pb }
    }

    /// Marks one more project as enriched.
    pub fn advance(&self, project_path: &str) {
        self.pb.inc(1);
        self.pb.set_prefix(project_path.to_string());
    }

    pub fn finish_phase_2(self, record_count: usize) {
        self.pb.finish_with_message(
            bright_green(format!("Phase 2/3: Enriched {record_count} projects ✓")).to_string(),
        );
    }

    pub fn start_phase_3(destination: &str) -> Self {
        let pb = create_spinner(
            bright_yellow(format!("Phase 3/3: Writing report to {destination}")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_3(self, destination: &str) {
        self.pb.finish_with_message(
            bright_green(format!("Phase 3/3: Report written to {destination} ✓")).to_string(),
        );
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn create_bar(len: u64, message: String) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}
