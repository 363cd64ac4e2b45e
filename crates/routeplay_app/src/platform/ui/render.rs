use routeplay_core::{AppViewModel, JobPhase};
use url::Url;

/// Renders the view model as terminal lines.
pub fn render(view: &AppViewModel, base_url: &Url) -> Vec<String> {
    let phase_label = match view.phase {
        JobPhase::Idle => "Idle",
        JobPhase::Streaming => "Running",
        JobPhase::LoadingRoute => "Loading route",
        JobPhase::Playing => "Playing",
        JobPhase::Finished => "Finished",
        JobPhase::Cancelled => "Cancelled",
        JobPhase::Failed => "Failed",
        JobPhase::Ended => "Stream ended",
    };

    let mut lines = Vec::new();
    let job = view
        .job_id
        .map(|id| format!("Job {id}"))
        .unwrap_or_else(|| "No job".to_string());
    lines.push(format!("{job} | {phase_label}"));

    // "~" marks an indicator that is not a real percentage.
    let marker = if view.progress.indeterminate { "~" } else { "" };
    lines.push(format!(
        "Progress: [{}] {}{}% {}",
        progress_bar(view.progress.percent),
        marker,
        view.progress.percent,
        view.progress.label
    ));

    for link in &view.downloads {
        let href = base_url
            .join(link.path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| link.path.to_string());
        lines.push(format!("{}: {}", link.label, href));
    }
    for path in &view.saved_artifacts {
        lines.push(format!("Saved: {}", path.display()));
    }
    if let Some(points) = view.route_points {
        lines.push(format!("Route: {points} points"));
    }
    if let Some(position) = view.marker {
        lines.push(format!("Train at {:.5}, {:.5}", position.lat, position.lon));
    }
    if let Some(info) = &view.info {
        lines.push(info.clone());
    }
    lines
}

fn progress_bar(percent: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(percent.min(100)) * WIDTH / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

/// Prints only the lines that changed since the previous frame.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    last: Vec<String>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines that differ from the previous frame, in order.
    pub fn diff(&mut self, lines: Vec<String>) -> Vec<String> {
        let changed = lines
            .iter()
            .enumerate()
            .filter(|(index, line)| self.last.get(*index) != Some(*line))
            .map(|(_, line)| line.clone())
            .collect();
        self.last = lines;
        changed
    }

    pub fn present(&mut self, lines: Vec<String>) {
        for line in self.diff(lines) {
            println!("{line}");
        }
    }
}
