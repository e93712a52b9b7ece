//! egui application state and rendering for the profile finder.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use eframe::egui;
use egui::Color32;
use finder_core::{Profile, SearchSnapshot};

use crate::bridge::{BackendCommand, UiEvent};

pub struct FinderApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    /// Latest controller snapshot; everything below the search row renders
    /// from this.
    snapshot: SearchSnapshot,
    /// Local text buffer for the search box. Re-synced from the snapshot
    /// whenever the controller rewrites the query (history selection or a
    /// successful search clearing it).
    username_input: String,
    status: String,
    backend_failed: bool,
}

impl FinderApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            snapshot: SearchSnapshot::default(),
            username_input: String::new(),
            status: "Starting backend...".to_string(),
            backend_failed: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::BackendFailed(message) => {
                    self.status = message;
                    self.backend_failed = true;
                }
                UiEvent::SnapshotChanged(snapshot) => {
                    if snapshot.query != self.snapshot.query {
                        self.username_input = snapshot.query.clone();
                    }
                    self.snapshot = snapshot;
                }
            }
        }
    }

    fn show_search_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let input = egui::TextEdit::singleline(&mut self.username_input)
                .hint_text("Enter GitHub username")
                .desired_width(280.0);
            let response = ui.add(input);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if (ui.button("Search").clicked() || submitted) && !self.backend_failed {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::Search {
                        username: self.username_input.clone(),
                    },
                    &mut self.status,
                );
            }
        });
    }

    fn show_history_section(&mut self, ui: &mut egui::Ui) {
        let toggle_label = if self.snapshot.history_visible {
            "Hide Search History"
        } else {
            "Show Search History"
        };
        if ui.button(toggle_label).clicked() {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::ToggleHistoryVisibility,
                &mut self.status,
            );
        }

        if !self.snapshot.history_visible {
            return;
        }

        ui.add_space(4.0);
        ui.strong("Search History");
        if self.snapshot.history.is_empty() {
            ui.label("No searches yet");
            return;
        }

        let entries = self.snapshot.history.clone();
        for entry in &entries {
            ui.horizontal(|ui| {
                if ui.link(entry.as_str()).clicked() {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::SelectFromHistory {
                            username: entry.clone(),
                        },
                        &mut self.status,
                    );
                }
                if ui.small_button("Remove").clicked() {
                    dispatch_backend_command(
                        &self.cmd_tx,
                        BackendCommand::RemoveFromHistory {
                            username: entry.clone(),
                        },
                        &mut self.status,
                    );
                }
            });
        }
        if ui.button("Clear History").clicked() {
            dispatch_backend_command(&self.cmd_tx, BackendCommand::ClearHistory, &mut self.status);
        }
    }

    fn show_result_section(&mut self, ui: &mut egui::Ui) {
        if self.snapshot.loading {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Loading...");
            });
            return;
        }

        if let Some(error) = &self.snapshot.last_error {
            ui.colored_label(Color32::from_rgb(200, 70, 70), error.to_string());
        }

        let Some(profile) = self.snapshot.profile.clone() else {
            return;
        };

        ui.separator();
        ui.hyperlink_to(
            egui::RichText::new(display_name(&profile)).heading(),
            &profile.html_url,
        );
        ui.label(format!("@{}", profile.login));
        ui.label(bio_text(&profile));
        ui.horizontal(|ui| {
            ui.hyperlink_to("Avatar", &profile.avatar_url);
            ui.hyperlink_to(
                "Repositories",
                format!("https://github.com/{}?tab=repositories", profile.login),
            );
            ui.hyperlink_to(
                "Projects",
                format!("https://github.com/{}?tab=projects", profile.login),
            );
        });
        ui.add_space(4.0);
        ui.label(stats_summary(&profile));

        ui.add_space(8.0);
        ui.strong("Followers:");
        if self.snapshot.followers.is_empty() {
            ui.label("No followers to show");
            return;
        }
        egui::ScrollArea::vertical()
            .max_height(220.0)
            .show(ui, |ui| {
                for follower in &self.snapshot.followers {
                    ui.hyperlink_to(follower.login.as_str(), &follower.html_url);
                }
            });
    }
}

impl eframe::App for FinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("GitHub Profile Finder");
            ui.add_space(8.0);

            self.show_search_row(ui);
            ui.add_space(8.0);
            self.show_history_section(ui);
            ui.add_space(8.0);
            self.show_result_section(ui);

            ui.add_space(8.0);
            ui.separator();
            ui.weak(self.status.as_str());
        });

        if self.snapshot.loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::Search { .. } => "search",
        BackendCommand::SelectFromHistory { .. } => "select_from_history",
        BackendCommand::RemoveFromHistory { .. } => "remove_from_history",
        BackendCommand::ClearHistory => "clear_history",
        BackendCommand::ToggleHistoryVisibility => "toggle_history_visibility",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected; restart the app".to_string();
        }
    }
}

fn display_name(profile: &Profile) -> String {
    profile
        .name
        .clone()
        .unwrap_or_else(|| "User Name".to_string())
}

fn bio_text(profile: &Profile) -> String {
    profile
        .bio
        .clone()
        .unwrap_or_else(|| "This user has no bio.".to_string())
}

fn stats_summary(profile: &Profile) -> String {
    format!(
        "Followers: {}  Following: {}  Repos: {}",
        profile.followers, profile.following, profile.public_repos
    )
}
