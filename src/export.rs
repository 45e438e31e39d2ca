use crate::error::Result;
use crate::store::MeasurementTable;
use std::io::Write;
use std::path::Path;

/// Fixed file name the table tab exports to, relative to the working
/// directory. Never the store itself.
pub const EXPORT_FILE: &str = "Data export.csv";

pub fn write_csv(writer: impl Write, table: &MeasurementTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if !table.headers.is_empty() {
        wtr.write_record(&table.headers)?;
    }
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_table_csv<P: AsRef<Path>>(path: P, table: &MeasurementTable) -> Result<()> {
    write_csv(std::fs::File::create(path)?, table)
}
