//! "Plot data" tab. Only holds the user's choices; nothing is plotted.

use eframe::egui;
use log::debug;

/// Time window offered by the range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    Max,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::YearToDate,
        TimeRange::OneYear,
        TimeRange::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::YearToDate => "YTD",
            TimeRange::OneYear => "1Y",
            TimeRange::Max => "MAX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotOptions {
    pub time_range: TimeRange,
    pub moving_average_7day: bool,
    pub line_mode: bool,
    pub units_lbs: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            time_range: TimeRange::default(),
            moving_average_7day: true,
            line_mode: false,
            units_lbs: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct PlotTab {
    pub options: PlotOptions,
}

impl PlotTab {
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.add_space(30.0);
        ui.group(|ui| {
            ui.label("Select data range");
            egui::ComboBox::from_id_source("plot_range_combo")
                .selected_text(self.options.time_range.label())
                .show_ui(ui, |ui| {
                    for range in TimeRange::ALL {
                        ui.selectable_value(&mut self.options.time_range, range, range.label());
                    }
                });
        });
        ui.group(|ui| {
            ui.label("Plot options");
            ui.checkbox(&mut self.options.moving_average_7day, "7 day average");
            ui.checkbox(&mut self.options.line_mode, "Lineplot");
            ui.checkbox(&mut self.options.units_lbs, "Plot in lbs");
        });
        ui.add_space(30.0);
        if ui.button("Plot data").clicked() {
            debug!("Plot requested with {:?}", self.options);
        }
    }
}
