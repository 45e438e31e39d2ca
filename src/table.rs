//! "View table" tab: an editable grid over an in-memory copy of the store.

use eframe::egui;
use egui_extras::{Column, TableBuilder};
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::export::{EXPORT_FILE, save_table_csv};
use crate::store::{MeasurementStore, MeasurementTable};

pub struct TableTab {
    store: MeasurementStore,
    export_path: PathBuf,
    table: MeasurementTable,
    scroll_to_bottom: bool,
    status: Option<String>,
    error: Option<String>,
}

impl TableTab {
    /// Load the store once. A read failure aborts construction.
    pub fn new(store: MeasurementStore) -> Result<Self> {
        Self::with_export_path(store, EXPORT_FILE)
    }

    pub fn with_export_path<P: Into<PathBuf>>(store: MeasurementStore, export_path: P) -> Result<Self> {
        let table = store.load()?;
        Ok(Self {
            store,
            export_path: export_path.into(),
            table,
            scroll_to_bottom: true,
            status: None,
            error: None,
        })
    }

    pub fn table(&self) -> &MeasurementTable {
        &self.table
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Read the store from disk without touching the in-memory copy.
    pub fn load(&self) -> Result<MeasurementTable> {
        self.store.load()
    }

    /// Replace the in-memory copy with a fresh read, discarding edits.
    /// On failure the current copy is kept.
    pub fn reload(&mut self) -> Result<()> {
        self.table = self.load()?;
        self.scroll_to_bottom = true;
        info!(
            "Loaded {} rows from {}",
            self.table.row_count(),
            self.store.path().display()
        );
        Ok(())
    }

    pub fn on_cell_edited(&mut self, row: usize, column: usize, new_text: &str) {
        if !self.table.set_cell(row, column, new_text) {
            log::warn!("Ignoring edit outside the table at ({row}, {column})");
        }
    }

    /// Write the in-memory copy, edits included, to the export file.
    pub fn export(&self) -> Result<PathBuf> {
        save_table_csv(&self.export_path, &self.table)?;
        info!("CSV file exported");
        Ok(self.export_path.clone())
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let button_height = ui.spacing().interact_size.y * 2.0 + ui.spacing().item_spacing.y * 3.0;
        let table_height = (ui.available_height() - button_height).max(100.0);

        let mut edits: Vec<(usize, usize, String)> = Vec::new();
        ui.allocate_ui(egui::vec2(ui.available_width(), table_height), |ui| {
            self.grid(ui, &mut edits);
        });
        for (row, column, text) in edits {
            self.on_cell_edited(row, column, &text);
        }

        ui.vertical_centered_justified(|ui| {
            if ui.button("Load csv").clicked() {
                match self.reload() {
                    Ok(()) => self.status = None,
                    Err(err) => {
                        error!("Failed to reload {}: {err}", self.store.path().display());
                        self.error = Some(err.to_string());
                    }
                }
            }
            if ui.button("Write to csv").clicked() {
                match self.export() {
                    Ok(path) => self.status = Some(format!("Exported to {}", path.display())),
                    Err(err) => {
                        error!("Failed to export {}: {err}", self.export_path().display());
                        self.error = Some(err.to_string());
                    }
                }
            }
        });
        if let Some(status) = &self.status {
            ui.label(status.as_str());
        }

        if let Some(msg) = self.error.clone() {
            let mut open = true;
            egui::Window::new("Warning")
                .id(egui::Id::new("table_error"))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .open(&mut open)
                .show(ui.ctx(), |ui| {
                    ui.label(msg);
                });
            if !open {
                self.error = None;
            }
        }
    }

    fn grid(&mut self, ui: &mut egui::Ui, edits: &mut Vec<(usize, usize, String)>) {
        let columns = self.table.column_count();
        if columns == 0 {
            ui.label("The measurement store is empty.");
            return;
        }
        let row_height = ui.spacing().interact_size.y;
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::remainder(), columns);
        if self.scroll_to_bottom && self.table.row_count() > 0 {
            builder = builder.scroll_to_row(self.table.row_count() - 1, Some(egui::Align::BOTTOM));
            self.scroll_to_bottom = false;
        }
        let table = &self.table;
        builder
            .header(row_height, |mut header| {
                for name in &table.headers {
                    header.col(|ui| {
                        ui.strong(name.as_str());
                    });
                }
            })
            .body(|mut body| {
                for r in 0..table.row_count() {
                    body.row(row_height, |mut row| {
                        for c in 0..columns {
                            row.col(|ui| {
                                let mut text = table.cell(r, c).unwrap_or_default().to_owned();
                                let resp = ui.add(
                                    egui::TextEdit::singleline(&mut text)
                                        .desired_width(f32::INFINITY),
                                );
                                if resp.changed() {
                                    edits.push((r, c, text));
                                }
                            });
                        }
                    });
                }
            });
    }
}
