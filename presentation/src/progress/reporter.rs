//! Progress reporting for plan execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use squad_application::ExecutionProgress;
use squad_domain::ExecutionPhase;
use std::sync::Mutex;

/// Reports progress during plan execution with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_label(phase: &ExecutionPhase) -> String {
        format!("Phase {}: {}", phase.number, phase.name)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionProgress for ProgressReporter {
    fn on_phase_start(&self, phase: &ExecutionPhase) {
        let pb = self.multi.add(ProgressBar::new(phase.agents.len() as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_label(phase));
        pb.set_message("Starting...");

        *self.phase_bar.lock().unwrap_or_else(|e| e.into_inner()) = Some(pb);
    }

    fn on_agent_complete(&self, _phase: &ExecutionPhase, agent: &str, success: bool) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &ExecutionPhase) {
        if let Some(pb) = self
            .phase_bar
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            pb.finish_with_message(format!("{} complete!", phase.name.green()));
        }
    }
}

/// Simple line-based progress (no bars), for non-terminal output
pub struct SimpleProgress;

impl ExecutionProgress for SimpleProgress {
    fn on_phase_start(&self, phase: &ExecutionPhase) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            ProgressReporter::phase_label(phase).bold(),
            phase.agents.len()
        );
    }

    fn on_agent_complete(&self, _phase: &ExecutionPhase, agent: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_phase_complete(&self, _phase: &ExecutionPhase) {
        eprintln!();
    }
}
