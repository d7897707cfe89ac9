//! Tolerant parsing for the two SDMX payload shapes the portal serves.

use chrono::NaiveDate;
use macrolens_types::MacrolensError;

/// Parse an SDMX time period: full dates, "2026-08" months, and "2026"
/// years all collapse to the first covered day.
pub(crate) fn parse_period(s: &str) -> Result<NaiveDate, MacrolensError> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    Err(MacrolensError::Data(format!("bad SDMX time period {s:?}")))
}

/// Extract `(date, value)` pairs from an SDMX JSON message, in period order.
///
/// The message keys observations by index into the `TIME_PERIOD` dimension
/// of the structure block; only the first series in the data set is read,
/// which is all a single-key request ever returns.
pub(crate) fn observations(
    body: &serde_json::Value,
) -> Result<Vec<(NaiveDate, f64)>, MacrolensError> {
    let periods: Vec<&str> = body["structure"]["dimensions"]["observation"]
        .as_array()
        .and_then(|dims| {
            dims.iter()
                .find(|d| d["id"].as_str() == Some("TIME_PERIOD"))
        })
        .and_then(|dim| dim["values"].as_array())
        .map(|values| values.iter().filter_map(|v| v["id"].as_str()).collect())
        .unwrap_or_default();

    let series = body["dataSets"][0]["series"]
        .as_object()
        .and_then(|s| s.values().next())
        .ok_or_else(|| MacrolensError::Data("SDMX message holds no series".to_string()))?;
    let obs = series["observations"]
        .as_object()
        .ok_or_else(|| MacrolensError::Data("SDMX series holds no observations".to_string()))?;

    let mut rows: Vec<(usize, NaiveDate, f64)> = Vec::with_capacity(obs.len());
    for (index, values) in obs {
        let Ok(index) = index.parse::<usize>() else {
            continue;
        };
        let Some(period) = periods.get(index) else {
            continue;
        };
        let Some(value) = values.as_array().and_then(|v| v.first()).and_then(|v| v.as_f64())
        else {
            continue;
        };
        rows.push((index, parse_period(period)?, value));
    }
    rows.sort_by_key(|(index, _, _)| *index);
    Ok(rows.into_iter().map(|(_, date, value)| (date, value)).collect())
}

/// Extract `(series_key, date, value)` rows from an SDMX CSV payload.
///
/// The portal quotes no fields in `csvdata` output, so a plain comma split
/// per line is sufficient.
pub(crate) fn csv_rows(body: &str) -> Result<Vec<(String, NaiveDate, f64)>, MacrolensError> {
    let mut lines = body.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| MacrolensError::Data("empty CSV payload".to_string()))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let position = |name: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(name));
    let key_col = position("KEY")
        .or_else(|| position("SERIES_KEY"))
        .ok_or_else(|| MacrolensError::Data("CSV payload lacks a KEY column".to_string()))?;
    let period_col = position("TIME_PERIOD")
        .ok_or_else(|| MacrolensError::Data("CSV payload lacks TIME_PERIOD".to_string()))?;
    let value_col = position("OBS_VALUE")
        .ok_or_else(|| MacrolensError::Data("CSV payload lacks OBS_VALUE".to_string()))?;

    let mut rows = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let (Some(key), Some(period), Some(value)) = (
            fields.get(key_col),
            fields.get(period_col),
            fields.get(value_col),
        ) else {
            continue;
        };
        let Ok(value) = value.parse::<f64>() else {
            continue;
        };
        rows.push((key.to_string(), parse_period(period)?, value));
    }
    Ok(rows)
}
