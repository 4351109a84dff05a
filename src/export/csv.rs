use std::io::Write;
use crate::aggregate::results::LabeledValues;
use crate::core::error::Result;
use crate::query::view::FilteredView;

pub const REPORT_HEADER: [&str; 11] = [
    "Rank",
    "Name",
    "Platform",
    "Year",
    "Genre",
    "Publisher",
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

/// Write the view as CSV in view order. Returns the number of data rows.
/// Names that read as missing markers (`NA`, `N/A`, `null`, ...) are written
/// as-is, so those rows are skipped if the file is loaded back.
pub fn write_view_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<usize> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;

    let mut rows = 0;
    for record in view.records() {
        csv_writer.write_record([
            record.rank.map(|r| r.to_string()).unwrap_or_default(),
            record.name.clone(),
            record.platform.clone(),
            record.year.map(|y| y.to_string()).unwrap_or_default(),
            record.genre.clone(),
            record.publisher.clone(),
            record.na_sales.to_string(),
            record.eu_sales.to_string(),
            record.jp_sales.to_string(),
            record.other_sales.to_string(),
            record.global_sales.to_string(),
        ])?;
        rows += 1;
    }

    csv_writer.flush()?;
    Ok(rows)
}

/// Two-column `label,value` CSV for label/value aggregates
pub fn write_labeled_csv<W: Write>(result: &LabeledValues, writer: W) -> Result<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    csv_writer.write_record(["label", "value"])?;
    for (label, value) in result.iter() {
        csv_writer.write_record([label.to_string(), value.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}
