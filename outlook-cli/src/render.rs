//! Human-friendly output: the current-conditions card and the day table.

use clap::ValueEnum;
use outlook_core::{
    CurrentConditions, DayRow, Fixed2, Outlook, Zone, outlook::PLACEHOLDER_COUNTRY,
};
use serde::Serialize;
use std::{cmp::Ordering, fmt::Write};

/// Columns the day table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Date,
    AvgTemp,
    MinTemp,
    MaxTemp,
    Weather,
    Pressure,
    Humidity,
    Sunrise,
    Sunset,
    Country,
}

impl SortColumn {
    fn compare(self, a: &DayRow, b: &DayRow) -> Ordering {
        let by_value = |x: Fixed2, y: Fixed2| x.value().total_cmp(&y.value());

        match self {
            SortColumn::Date => a.date.cmp(&b.date),
            SortColumn::AvgTemp => by_value(a.average_temperature, b.average_temperature),
            SortColumn::MinTemp => by_value(a.min_temperature, b.min_temperature),
            SortColumn::MaxTemp => by_value(a.max_temperature, b.max_temperature),
            SortColumn::Weather => a.dominant_description.cmp(&b.dominant_description),
            SortColumn::Pressure => by_value(a.average_pressure, b.average_pressure),
            SortColumn::Humidity => by_value(a.average_humidity, b.average_humidity),
            SortColumn::Sunrise => a.sunrise.cmp(&b.sunrise),
            SortColumn::Sunset => a.sunset.cmp(&b.sunset),
            SortColumn::Country => a.country.cmp(&b.country),
        }
    }
}

/// Sorting and filtering applied to the rows before display.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    pub sort: Option<SortColumn>,
    pub descending: bool,
    pub filter: Option<String>,
}

impl TableView {
    /// Rows matching the filter, in the requested order. Without a sort
    /// column, rows keep the order they were assembled in.
    pub fn apply<'a>(&self, rows: &'a [DayRow]) -> Vec<&'a DayRow> {
        let needle = self
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase);

        let mut visible: Vec<&DayRow> = rows
            .iter()
            .filter(|row| needle.as_deref().is_none_or(|n| matches(row, n)))
            .collect();

        if let Some(column) = self.sort {
            visible.sort_by(|a, b| {
                let ord = column.compare(a, b);
                if self.descending { ord.reverse() } else { ord }
            });
        }

        visible
    }
}

fn matches(row: &DayRow, needle: &str) -> bool {
    [&row.date, &row.dominant_description, &row.country]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

const HEADERS: [&str; 10] = [
    "Date",
    "Average Temp (°C)",
    "Min Temp (°C)",
    "Max Temp (°C)",
    "Weather",
    "Pressure (hPa)",
    "Humidity (%)",
    "Sunrise",
    "Sunset",
    "Country",
];

fn cells(row: &DayRow) -> [String; 10] {
    [
        row.date.clone(),
        row.average_temperature.to_string(),
        row.min_temperature.to_string(),
        row.max_temperature.to_string(),
        row.dominant_description.clone(),
        row.average_pressure.to_string(),
        row.average_humidity.to_string(),
        row.sunrise.clone(),
        row.sunset.clone(),
        row.country.clone(),
    ]
}

/// Plain-text table with one line per day.
pub fn render_table(rows: &[&DayRow]) -> String {
    if rows.is_empty() {
        return "No forecast days to show.\n".to_string();
    }

    let body: Vec<[String; 10]> = rows.iter().map(|r| cells(r)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);

    for line in &body {
        push_line(&mut out, line, &widths);
    }

    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Labeled fields for the current reading.
pub fn render_current(current: &CurrentConditions, current_date: &str, zone: &Zone) -> String {
    let time = |ts: i64| zone.time_of_day(ts).unwrap_or_else(|| "?".to_string());
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Current Weather in {} on {current_date}", current.location_name);
    let fields = [
        ("Description", current.description.clone()),
        ("Temperature", format!("{} °C", current.temperature)),
        ("Max Temperature", format!("{} °C", current.temperature_max)),
        ("Min Temperature", format!("{} °C", current.temperature_min)),
        ("Humidity", format!("{}%", current.humidity)),
        ("Sunrise", time(current.sunrise_time)),
        ("Sunset", time(current.sunset_time)),
        (
            "Country",
            current
                .country
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_COUNTRY.to_string()),
        ),
        ("Pressure", format!("{} hPa", current.pressure)),
    ];

    for (label, value) in fields {
        let _ = writeln!(out, "  {label:<16} {value}");
    }

    out
}

/// Card followed by the table.
pub fn render_outlook(outlook: &Outlook, view: &TableView, zone: &Zone) -> String {
    let rows = view.apply(&outlook.rows);

    format!(
        "{}\nDaily Outlook\n{}",
        render_current(&outlook.current, &outlook.current_date, zone),
        render_table(&rows)
    )
}

#[derive(Serialize)]
struct OutlookJson<'a> {
    location: &'a str,
    current_date: &'a str,
    current: &'a CurrentConditions,
    rows: Vec<&'a DayRow>,
}

pub fn render_json(outlook: &Outlook, view: &TableView) -> anyhow::Result<String> {
    let doc = OutlookJson {
        location: &outlook.location,
        current_date: &outlook.current_date,
        current: &outlook.current,
        rows: view.apply(&outlook.rows),
    };

    Ok(serde_json::to_string_pretty(&doc)?)
}
