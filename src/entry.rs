//! "Add data" tab: weight, date and comment fields plus the submit flow.

use chrono::{Local, NaiveDate, NaiveDateTime};
use eframe::egui;
use egui_extras::DatePickerButton;
use log::{error, info};

use crate::error::Result;
use crate::store::{DATE_FORMAT, Measurement, MeasurementStore};

/// True iff `text` is exactly `YYYY-MM-DD` and names a real calendar day.
pub fn validate_date_format(text: &str) -> bool {
    let b = text.as_bytes();
    let shape_ok = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    shape_ok && NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok()
}

/// True iff the date in `text`, taken at midnight, is not after `now`.
/// Malformed input is rejected.
pub fn validate_date_not_future(text: &str, now: NaiveDateTime) -> bool {
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .is_some_and(|midnight| midnight <= now),
        Err(_) => false,
    }
}

/// Weight field filter: an optional sign, digits and at most one decimal
/// point. Partial numbers such as `-` or `.` are allowed while typing.
pub fn is_weight_input(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    digits.chars().all(|c| c.is_ascii_digit() || c == '.') && digits.matches('.').count() <= 1
}

/// A finished weight: empty, or a number with at least one digit.
pub fn is_complete_weight(text: &str) -> bool {
    text.is_empty() || (is_weight_input(text) && text.chars().any(|c| c.is_ascii_digit()))
}

/// Result of pressing "Add value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    BadFormat,
    FutureDate,
    BadWeight,
    Confirm(Measurement),
}

impl SubmitOutcome {
    pub fn title(&self) -> &'static str {
        match self {
            SubmitOutcome::BadFormat | SubmitOutcome::FutureDate | SubmitOutcome::BadWeight => {
                "Warning"
            }
            SubmitOutcome::Confirm(_) => "New entry",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::BadFormat => "Date entered in incorrect format.",
            SubmitOutcome::FutureDate => "Date entered is invalid since it is after today's date.",
            SubmitOutcome::BadWeight => "Weight entered is not a number.",
            SubmitOutcome::Confirm(_) => "New entry added to weight log",
        }
    }
}

pub struct EntryForm {
    store: MeasurementStore,
    pub weight: String,
    pub date: String,
    pub comment: String,
    picked_date: NaiveDate,
    weight_hint: String,
    pending: Option<SubmitOutcome>,
    error: Option<String>,
}

impl EntryForm {
    /// Build the form. Fails if the store cannot be read for the hint.
    pub fn new(store: MeasurementStore) -> Result<Self> {
        let weight_hint = store.last_measurement()?;
        let today = Local::now().date_naive();
        Ok(Self {
            store,
            weight: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            comment: String::new(),
            picked_date: today,
            weight_hint,
            pending: None,
            error: None,
        })
    }

    pub fn last_measurement(&self) -> Result<String> {
        self.store.last_measurement()
    }

    pub fn weight_hint(&self) -> &str {
        &self.weight_hint
    }

    pub fn pending(&self) -> Option<&SubmitOutcome> {
        self.pending.as_ref()
    }

    /// Validate the current fields. Never touches the store.
    pub fn submit(&self, now: NaiveDateTime) -> SubmitOutcome {
        if !validate_date_format(&self.date) {
            return SubmitOutcome::BadFormat;
        }
        if !validate_date_not_future(&self.date, now) {
            return SubmitOutcome::FutureDate;
        }
        let weight = self.weight.trim();
        if !is_complete_weight(weight) {
            return SubmitOutcome::BadWeight;
        }
        match NaiveDate::parse_from_str(&self.date, DATE_FORMAT) {
            Ok(date) => SubmitOutcome::Confirm(Measurement {
                date,
                weight: weight.to_owned(),
                comment: self.comment.clone(),
            }),
            Err(_) => SubmitOutcome::BadFormat,
        }
    }

    /// Append a confirmed entry and refresh the weight hint.
    pub fn confirm(&mut self, entry: &Measurement) -> Result<()> {
        self.store.append(entry)?;
        info!("Entry added");
        self.weight_hint = self.last_measurement()?;
        Ok(())
    }

    fn on_submit_clicked(&mut self) {
        let outcome = self.submit(Local::now().naive_local());
        self.pending = Some(outcome);
    }

    /// Handle the dialog buttons. `accepted` is `true` for OK.
    fn close_dialog(&mut self, accepted: bool) {
        if let Some(SubmitOutcome::Confirm(entry)) = self.pending.take() {
            if accepted {
                if let Err(err) = self.confirm(&entry) {
                    error!("Failed to append entry to {}: {err}", self.store.path().display());
                    self.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.add_space(30.0);
        ui.label("Weight (kg):");
        let mut weight = self.weight.clone();
        let resp = ui.add(
            egui::TextEdit::singleline(&mut weight)
                .hint_text(self.weight_hint.as_str())
                .desired_width(f32::INFINITY),
        );
        if resp.changed() && is_weight_input(&weight) {
            self.weight = weight;
        }

        ui.label("Date:");
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.date).desired_width(200.0));
            if let Ok(d) = NaiveDate::parse_from_str(&self.date, DATE_FORMAT) {
                self.picked_date = d;
            }
            if ui
                .add(DatePickerButton::new(&mut self.picked_date).id_source("entry_date_picker"))
                .changed()
            {
                self.date = self.picked_date.format(DATE_FORMAT).to_string();
            }
        });

        ui.label("Comment:");
        ui.add(
            egui::TextEdit::singleline(&mut self.comment)
                .hint_text("Optional")
                .desired_width(f32::INFINITY),
        );

        ui.add_space(30.0);
        if ui.button("Add value").clicked() {
            self.on_submit_clicked();
        }

        self.dialogs(ui.ctx());
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        if let Some(outcome) = self.pending().cloned() {
            let mut result = None;
            egui::Window::new(outcome.title())
                .id(egui::Id::new("entry_dialog"))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(outcome.message());
                    ui.horizontal(|ui| {
                        if ui.button("OK").clicked() {
                            result = Some(true);
                        }
                        if matches!(outcome, SubmitOutcome::Confirm(_))
                            && ui.button("Cancel").clicked()
                        {
                            result = Some(false);
                        }
                    });
                });
            if let Some(accepted) = result {
                self.close_dialog(accepted);
            }
        }

        if let Some(msg) = self.error.clone() {
            let mut open = true;
            egui::Window::new("Error")
                .id(egui::Id::new("entry_error"))
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(msg);
                });
            if !open {
                self.error = None;
            }
        }
    }
}
