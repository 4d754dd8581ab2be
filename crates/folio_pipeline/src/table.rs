//! CSV rendering for table steps.

use crate::TableSpec;
use crate::template;
use folio_core::RunContext;
use folio_error::{PipelineError, PipelineErrorKind, PipelineResult};

/// Resolve every cell of `table` against `context` and render CSV bytes.
///
/// With a total column configured, a trailing row is appended with `Total` in
/// the first column and the sum of that column's cells.
pub fn render_csv(table: &TableSpec, context: &RunContext, step: &str) -> PipelineResult<Vec<u8>> {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.rows().len() + 1);
    for row in table.rows() {
        let cells = row
            .iter()
            .map(|cell| template::resolve(cell, context, step))
            .collect::<PipelineResult<Vec<_>>>()?;
        rows.push(cells);
    }

    if let Some(column) = table.total_column() {
        let index = table
            .columns()
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| failed(step, format!("Unknown total column '{}'", column)))?;

        let mut total = 0.0_f64;
        let mut decimals = 0;
        for row in &rows {
            let cell = row.get(index).map(|cell| cell.trim()).unwrap_or_default();
            if cell.is_empty() {
                continue;
            }
            total += cell.parse::<f64>().map_err(|_| {
                failed(step, format!("Cell '{}' in column '{}' is not a number", cell, column))
            })?;
            decimals = decimals.max(decimal_places(cell));
        }

        let mut total_row = vec![String::new(); table.columns().len()];
        if let Some(first) = total_row.first_mut() {
            *first = "Total".to_string();
        }
        total_row[index] = format_number(total, decimals);
        rows.push(total_row);
    }

    let mut csv = String::new();
    write_record(&mut csv, table.columns());
    for row in &rows {
        write_record(&mut csv, row);
    }
    Ok(csv.into_bytes())
}

fn failed(step: &str, reason: String) -> PipelineError {
    PipelineError::new(PipelineErrorKind::StepFailed {
        step: step.to_string(),
        reason,
    })
}

/// Digits after the decimal point in a plain numeric cell.
fn decimal_places(cell: &str) -> usize {
    cell.split_once('.')
        .map(|(_, fraction)| fraction.chars().take_while(char::is_ascii_digit).count())
        .unwrap_or(0)
}

/// Render a sum with the precision of its most precise input.
fn format_number(value: f64, decimals: usize) -> String {
    let rounded = format!("{:.*}", decimals, value);
    if rounded.starts_with('-') && rounded[1..].chars().all(|c| c == '0' || c == '.') {
        rounded[1..].to_string()
    } else {
        rounded
    }
}

fn write_record(out: &mut String, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if cell.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Artifact;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn renders_total_row() {
        let table = TableSpec::new(
            strings(&["Category", "Amount", "Description"]),
            vec![
                strings(&["Advertising", "100", "Social media ads, Google ads"]),
                strings(&["Miscellaneous", "20", "Unexpected expenses"]),
            ],
        )
        .with_total_column("Amount");

        let csv = render_csv(&table, &RunContext::new("p"), "budget").unwrap();
        let csv = String::from_utf8(csv).unwrap();

        assert_eq!(
            csv,
            "Category,Amount,Description\r\n\
             Advertising,100,\"Social media ads, Google ads\"\r\n\
             Miscellaneous,20,Unexpected expenses\r\n\
             Total,120,\r\n"
        );
    }

    #[test]
    fn resolves_cell_templates_and_escapes_quotes() {
        let mut context = RunContext::new("p");
        context.insert("concept", Artifact::Text("The \"Bright\" launch".to_string()));
        let table = TableSpec::new(
            strings(&["Platform", "Post"]),
            vec![strings(&["Twitter", "Introducing: {concept}"])],
        );

        let csv = String::from_utf8(render_csv(&table, &context, "schedule").unwrap()).unwrap();

        assert!(csv.ends_with("Twitter,\"Introducing: The \"\"Bright\"\" launch\"\r\n"));
    }

    #[test]
    fn total_keeps_input_precision() {
        let table = TableSpec::new(
            strings(&["Item", "Cost"]),
            vec![
                strings(&["Ads", "0.1"]),
                strings(&["Print", "0.20"]),
                strings(&["Misc", "3"]),
            ],
        )
        .with_total_column("Cost");

        let csv = String::from_utf8(render_csv(&table, &RunContext::new("p"), "budget").unwrap())
            .unwrap();
        assert!(csv.ends_with("Total,3.30\r\n"), "{}", csv);
    }

    #[test]
    fn non_numeric_total_cell_fails() {
        let table = TableSpec::new(strings(&["Item", "Cost"]), vec![strings(&["Ads", "lots"])])
            .with_total_column("Cost");

        let err = render_csv(&table, &RunContext::new("p"), "budget").unwrap_err();
        assert!(err.kind.to_string().contains("not a number"));
    }
}
