mod state;
mod ui;

use eframe::{egui, App};
use parse_uploader::api::ParseApiClient;
use parse_uploader::error::ApiError;
use parse_uploader::workflow::{PendingRequest, SelectedFile};
use state::AppState;
use std::path::Path;
use std::sync::mpsc as std_mpsc;

pub struct ParseUploader {
    client: ParseApiClient,
    state: AppState,
}

impl ParseUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, client: ParseApiClient) -> Self {
        println!("Initializing document parser client");
        Self {
            client,
            state: AppState::default(),
        }
    }

    pub fn select_path(&mut self, path: &Path) {
        let file = match SelectedFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Cannot use {}: {}", path.display(), e);
                self.state.error_message = Some(format!("Arquivo inválido: {}", e));
                return;
            }
        };

        println!("Selected file: {}", file.label());
        match self.state.workflow.select_file(file) {
            Ok(()) => self.state.error_message = None,
            Err(e) => println!("Ignoring selection: {}", e),
        }
    }

    pub fn start_upload(&mut self, ctx: &egui::Context) {
        match self.state.begin_upload() {
            Ok(request) => self.dispatch(request, ctx),
            Err(e) => println!("Upload not started: {}", e),
        }
    }

    pub fn reload_staging(&mut self, ctx: &egui::Context) {
        match self.state.begin_staging_reload() {
            Ok(request) => self.dispatch(request, ctx),
            Err(e) => println!("Staging reload not started: {}", e),
        }
    }

    fn dispatch(&mut self, request: PendingRequest, ctx: &egui::Context) {
        println!("Starting {}", request.describe());

        let (sender, receiver) = std_mpsc::channel();
        self.state.outcome_receiver = Some(receiver);

        let client = self.client.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(request.execute(&client)),
                Err(e) => Err(ApiError::Transport(format!(
                    "Failed to start async runtime: {}",
                    e
                ))),
            };
            // The receiver is gone only if the window closed mid-request.
            let _ = sender.send(outcome);
            ctx.request_repaint();
        });
    }

    pub fn open_debug_log(&mut self) {
        let url = match self.client.debug_log_url() {
            Ok(url) => url,
            Err(e) => {
                self.state.error_message = Some(e.to_string());
                return;
            }
        };
        if let Err(e) = open::that(url.as_str()) {
            eprintln!("Failed to open {}: {}", url, e);
            self.state.error_message = Some(format!("Não foi possível abrir {}", url));
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.first() {
            self.select_path(path);
        }

        if self.state.poll_outcome() {
            ctx.request_repaint();
        }
    }
}

impl App for ParseUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
