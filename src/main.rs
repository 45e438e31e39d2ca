//! Body weight log: a three-tab window over a CSV measurement store.

use eframe::{App, Frame, NativeOptions, egui};
use log::info;

mod entry;
use entry::EntryForm;
mod error;
use error::Result;
mod export;
mod plot_options;
use plot_options::PlotTab;
mod settings;
use settings::Settings;
mod store;
use store::MeasurementStore;
mod table;
use table::TableTab;

const APP_TITLE: &str = "Body Weight Log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Add,
    Table,
    Plot,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Add, Tab::Table, Tab::Plot];

    fn label(self) -> &'static str {
        match self {
            Tab::Add => "Add data",
            Tab::Table => "View table",
            Tab::Plot => "Plot data",
        }
    }
}

struct WeightLogApp {
    active: Tab,
    entry: EntryForm,
    table: TableTab,
    plot: PlotTab,
}

impl WeightLogApp {
    /// Build every tab from the shared settings. Each tab gets its own
    /// store handle and keeps its own state.
    fn new(settings: &Settings) -> Result<Self> {
        let store = MeasurementStore::new(settings.database_path.clone());
        Ok(Self {
            active: Tab::Add,
            entry: EntryForm::new(store.clone())?,
            table: TableTab::new(store)?,
            plot: PlotTab::default(),
        })
    }

    fn show(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.active, tab, tab.label());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.active {
            Tab::Add => self.entry.ui(ui),
            Tab::Table => self.table.ui(ui),
            Tab::Plot => self.plot.ui(ui),
        });
    }
}

impl App for WeightLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.show(ctx);
    }
}

/// Dark palette with every text style scaled to the configured point size.
fn apply_style(ctx: &egui::Context, font_point_size: u32) {
    ctx.set_visuals(egui::Visuals::dark());
    let size = font_point_size as f32;
    let mut style = (*ctx.style()).clone();
    for (text_style, font_id) in style.text_styles.iter_mut() {
        font_id.size = match text_style {
            egui::TextStyle::Heading => size * 1.5,
            egui::TextStyle::Small => size * 0.75,
            _ => size,
        };
    }
    ctx.set_style(style);
}

fn native_options(settings: &Settings) -> NativeOptions {
    NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size(settings.window_size())
            .with_min_inner_size(settings.window_size()),
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let settings_path = Settings::locate();
    let settings = Settings::load(&settings_path)?;
    info!("Loaded settings from {}", settings_path.display());

    let app = WeightLogApp::new(&settings)?;
    let font_point_size = settings.font_point_size;
    eframe::run_native(
        APP_TITLE,
        native_options(&settings),
        Box::new(move |cc| {
            apply_style(&cc.egui_ctx, font_point_size);
            Box::new(app)
        }),
    )?;
    Ok(())
}
