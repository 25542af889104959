use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Progress tracking for multi-phase operations
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start_phase_1(pages: usize) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(
            bright_yellow(format!("Phase 1/3: Fetching {pages} pages of deployments")).to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_1_start_phase_2(self, deployments: usize) -> Self {
        self.pb
            .finish_with_message(bright_green("Phase 1/3: Fetched deployments ✓").to_string());
        let pb = create_spinner(
            bright_yellow(format!(
                "Phase 2/3: Resolving statuses for {deployments} deployments"
            ))
            .to_string(),
        );
        Self { pb }
    }

    pub fn finish_phase_2_start_phase_3(self) -> Self {
        self.pb.finish_with_message(
            bright_green("Phase 2/3: Resolved statuses for all deployments ✓").to_string(),
        );
        let pb = create_spinner(bright_yellow("Phase 3/3: Computing statistics").to_string());
        Self { pb }
    }

    pub fn finish_phase_3(self) {
        self.pb.finish_with_message(
            bright_green("Phase 3/3: Statistics computed successfully ✓").to_string(),
        );
        eprintln!("\n");
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
