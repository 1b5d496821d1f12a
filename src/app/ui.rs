use super::ParseUploader;
use eframe::egui::{self, Align, Color32, RichText};
use parse_uploader::workflow::{WorkflowState, ERROR_MARKER};
use rfd::FileDialog;
use std::collections::HashSet;

const ACCENT: Color32 = Color32::from_rgb(0, 123, 255);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 150, 0);
const EDITED_AMBER: Color32 = Color32::from_rgb(214, 150, 0);

impl ParseUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Plataforma de Automação");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Upload e Extração")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_upload_box(ui, ctx);

                    ui.add_space(10.0);
                    self.render_message(ui);

                    if !self.state.workflow.editable().is_empty() {
                        ui.add_space(10.0);
                        self.render_results(ui, ctx);
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });
    }

    fn render_upload_box(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let busy = self.state.workflow.is_busy();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                let pick = ui.add_enabled(!busy, egui::Button::new("📄 Selecionar arquivo"));
                if pick.clicked() {
                    if let Some(path) = FileDialog::new().pick_file() {
                        self.select_path(&path);
                    }
                }

                match self.state.workflow.selected_file() {
                    Some(file) => {
                        ui.label(file.label());
                    }
                    None => {
                        ui.label(
                            RichText::new("Nenhum arquivo (ou arraste um aqui)")
                                .color(ui.visuals().text_color().gamma_multiply(0.6)),
                        );
                    }
                }
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let label = if busy { "Processando..." } else { "Parsear" };
                let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
                    .fill(ACCENT)
                    .min_size(egui::vec2(160.0, 36.0));
                if ui
                    .add_enabled(self.state.workflow.can_upload(), button)
                    .clicked()
                {
                    self.start_upload(ctx);
                }
                if busy {
                    ui.spinner();
                }
            });
        });
    }

    fn render_message(&self, ui: &mut egui::Ui) {
        let message = self.state.workflow.message();
        if !message.is_empty() {
            let color = if message.starts_with(ERROR_MARKER) {
                ERROR_RED
            } else if self.state.workflow.state() == WorkflowState::Success {
                SUCCESS_GREEN
            } else {
                ui.visuals().text_color()
            };
            ui.colored_label(color, message);
        }

        if let Some(error) = &self.state.error_message {
            ui.colored_label(ERROR_RED, error);
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let changed: HashSet<String> = self
            .state
            .workflow
            .changed_fields()
            .into_iter()
            .map(|c| c.field_name)
            .collect();

        ui.horizontal(|ui| {
            ui.heading("Resultado (Edite antes de salvar)");
            if let Some(id) = self.state.workflow.operation_id() {
                ui.label(
                    RichText::new(format!("Operação #{}", id))
                        .color(ui.visuals().text_color().gamma_multiply(0.6)),
                );
            }
        });
        ui.add_space(8.0);

        let mut edits = Vec::new();
        let value_width = (ui.available_width() * 0.6).max(200.0);

        egui::Grid::new("parsed_fields")
            .num_columns(3)
            .striped(true)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Campo");
                ui.strong("Valor Editável");
                ui.strong("Confiança");
                ui.end_row();

                for field in self.state.workflow.editable().fields() {
                    let name = if changed.contains(&field.field_name) {
                        RichText::new(format!("● {}", field.field_name)).color(EDITED_AMBER)
                    } else {
                        RichText::new(&field.field_name)
                    };
                    let name_label = ui.label(name);
                    if let Some(original) = self.state.workflow.original().get(&field.field_name) {
                        if changed.contains(&field.field_name) {
                            name_label.on_hover_text(format!("Original: {}", original.parsed_value));
                        }
                    }

                    let mut value = field.parsed_value.clone();
                    let editor = egui::TextEdit::multiline(&mut value)
                        .desired_rows(2)
                        .desired_width(value_width);
                    if ui.add(editor).changed() {
                        edits.push((field.field_name.clone(), value));
                    }

                    match field.confidence_score {
                        Some(score) => ui.label(format!("{:.0}%", score * 100.0)),
                        None => ui.label("—"),
                    };
                    ui.end_row();
                }
            });

        for (name, value) in edits {
            self.state.workflow.edit_field(&name, &value);
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.add_enabled_ui(!changed.is_empty(), |ui| {
                if ui.button("↺ Desfazer edições").clicked() {
                    self.state.workflow.reset_edits();
                }
            });
            ui.add_enabled_ui(self.state.workflow.can_reload_staging(), |ui| {
                if ui.button("🔄 Recarregar staging").clicked() {
                    self.reload_staging(ctx);
                }
            });
            ui.checkbox(&mut self.state.show_original, "Mostrar original");
        });

        if self.state.show_original {
            ui.add_space(8.0);
            egui::Frame::none()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    for field in self.state.workflow.original().fields() {
                        ui.label(
                            RichText::new(format!("{}: {}", field.field_name, field.parsed_value))
                                .monospace(),
                        );
                    }
                });
        }
    }

    fn render_footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("Servidor: {}", self.client.base_url()))
                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
            );
            ui.add_space(8.0);
            if ui.link("Baixar log de depuração").clicked() {
                self.open_debug_log();
            }
        });
    }
}
