use chrono::NaiveDateTime;
use endurance_core::{Analysis, CapacitySource, EnduranceMetrics, Snapshot, WafSource};

const WIDTH: usize = 80;
const TIB: f64 = 1024.0 * 1024.0 * 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn render_report(analysis: &Analysis, generated_at: NaiveDateTime) -> String {
    let mut lines = Vec::new();

    lines.push("=".repeat(WIDTH));
    lines.push(format!("{:^width$}", "SSD ENDURANCE ANALYSIS REPORT", width = WIDTH));
    lines.push("=".repeat(WIDTH));
    lines.push(String::new());

    drive_info(&mut lines, analysis);
    analysis_params(&mut lines, analysis);
    snapshot_comparison(&mut lines, &analysis.first, &analysis.second, &analysis.metrics);
    endurance_metrics(&mut lines, &analysis.metrics);
    wear_analysis(&mut lines, &analysis.metrics, analysis.params.rated_endurance_cycles);
    methodology(&mut lines, analysis);

    lines.push("=".repeat(WIDTH));
    lines.push(format!(
        "Report generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push("=".repeat(WIDTH));

    lines.join("\n")
}

pub fn format_bytes(bytes: f64, precision: usize) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut value = bytes;
    let mut idx = 0;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    format!("{value:.precision$} {}", UNITS[idx])
}

pub fn ascii_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let format_row = |cells: Vec<&str>| {
        let body = widths
            .iter()
            .enumerate()
            .map(|(idx, &w)| format!(" {:<w$} ", cells.get(idx).copied().unwrap_or("")))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{body}|")
    };

    let mut out = vec![separator.clone(), format_row(headers.to_vec()), separator.clone()];
    out.extend(rows.iter().map(|row| format_row(row.iter().map(String::as_str).collect())));
    out.push(separator);
    out.join("\n")
}

pub fn wear_status(wear_percent: f64) -> &'static str {
    if wear_percent < 50.0 {
        "Good"
    } else if wear_percent < 80.0 {
        "Fair"
    } else if wear_percent < 95.0 {
        "Warning"
    } else {
        "Critical"
    }
}

pub fn life_status(remaining_years: f64) -> &'static str {
    if remaining_years > 3.0 {
        "Excellent"
    } else if remaining_years > 1.0 {
        "Good"
    } else if remaining_years > 0.5 {
        "Fair"
    } else {
        "Replace Soon"
    }
}

pub fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn remaining_days(days: f64) -> String {
    if days.is_infinite() {
        "unbounded".to_string()
    } else {
        format!("{days:.0} days")
    }
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(WIDTH));
}

fn key_values(lines: &mut Vec<String>, pairs: &[(&str, String)]) {
    for (label, value) in pairs {
        lines.push(format!("{label:<25}: {value}"));
    }
    lines.push(String::new());
}

fn drive_info(lines: &mut Vec<String>, analysis: &Analysis) {
    section(lines, "DRIVE INFORMATION");
    let snapshot = &analysis.second;
    let capacity = match snapshot.capacity_bytes {
        Some(bytes) => format_bytes(bytes as f64, 2),
        None => format!("{:.2} GB", analysis.params.capacity_gib),
    };
    key_values(
        lines,
        &[
            ("Model", snapshot.model.clone().unwrap_or_else(|| "Unknown".into())),
            ("Serial Number", snapshot.serial.clone().unwrap_or_else(|| "Unknown".into())),
            ("Capacity", capacity),
            ("Drive Type", snapshot.dialect.label().to_string()),
        ],
    );
}

fn analysis_params(lines: &mut Vec<String>, analysis: &Analysis) {
    section(lines, "ANALYSIS PARAMETERS");
    let params = &analysis.params;
    let capacity_note = match analysis.capacity_source {
        CapacitySource::Supplied => "",
        CapacitySource::Reported => " (auto-detected)",
    };
    key_values(
        lines,
        &[
            ("Host LBA Size", format!("{} KB per count", params.host_unit_size_kib)),
            ("Flash LBA Size", format!("{} KB per count", params.flash_unit_size_kib)),
            ("Rated P/E Cycles", params.rated_endurance_cycles.to_string()),
            ("Drive Capacity", format!("{:.2} GB{capacity_note}", params.capacity_gib)),
        ],
    );
}

fn snapshot_comparison(
    lines: &mut Vec<String>,
    first: &Snapshot,
    second: &Snapshot,
    metrics: &EnduranceMetrics,
) {
    section(lines, "SNAPSHOT COMPARISON");

    let timestamp = |s: &Snapshot| {
        s.timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "Unknown".into())
    };
    let mut rows = vec![
        vec![
            "Timestamp".to_string(),
            timestamp(first),
            timestamp(second),
            format!("{:.2} days", metrics.elapsed_days),
        ],
        vec![
            "Data Units Written".to_string(),
            grouped(first.data_units_written),
            grouped(second.data_units_written),
            grouped(second.data_units_written.saturating_sub(first.data_units_written)),
        ],
    ];

    let hours = |v: Option<u64>| v.map(grouped).unwrap_or_else(|| "N/A".into());
    let hours_delta = match (first.power_on_hours, second.power_on_hours) {
        (Some(a), Some(b)) => grouped(b.saturating_sub(a)),
        _ => "N/A".into(),
    };
    rows.push(vec![
        "Power On Hours".to_string(),
        hours(first.power_on_hours),
        hours(second.power_on_hours),
        hours_delta,
    ]);

    if let Some(used) = second.percentage_used {
        let (before, delta) = match first.percentage_used {
            Some(prev) => (format!("{prev}%"), format!("{}%", i64::from(used) - i64::from(prev))),
            None => ("N/A".into(), "N/A".into()),
        };
        rows.push(vec!["Percentage Used".to_string(), before, format!("{used}%"), delta]);
    }

    lines.push(ascii_table(&["Metric", "Snapshot 1", "Snapshot 2", "Delta"], &rows));
    lines.push(String::new());
}

fn endurance_metrics(lines: &mut Vec<String>, metrics: &EnduranceMetrics) {
    section(lines, "CALCULATED ENDURANCE METRICS");

    let waf_note = match metrics.waf_source {
        WafSource::Measured => "Write Amplification Factor",
        WafSource::Assumed => "Write Amplification Factor (assumed)",
    };
    let rows = vec![
        vec!["WAF".into(), format!("{:.2}", metrics.write_amplification_factor), waf_note.into()],
        vec![
            "TBW (Host)".into(),
            format!("{:.2} TB", metrics.total_host_bytes_written / TIB),
            "Total Bytes Written (Host)".into(),
        ],
        vec![
            "TBW (Flash)".into(),
            format!("{:.2} TB", metrics.total_flash_bytes_written / TIB),
            "Total Bytes Written (Flash)".into(),
        ],
        vec![
            "DWPD".into(),
            format!("{:.4}", metrics.drive_writes_per_day),
            "Drive Writes Per Day".into(),
        ],
        vec![
            "Daily Write Rate".into(),
            format!("{:.2} GB/day", metrics.daily_write_rate_gib),
            "Average daily host writes".into(),
        ],
    ];

    lines.push(ascii_table(&["Metric", "Value", "Description"], &rows));
    lines.push(String::new());
}

fn wear_analysis(lines: &mut Vec<String>, metrics: &EnduranceMetrics, rated_cycles: u64) {
    section(lines, "WEAR AND LIFETIME ANALYSIS");

    let (remaining, years) = if metrics.estimated_remaining_days.is_infinite() {
        ("unbounded".to_string(), "no flash writes".to_string())
    } else {
        (
            remaining_days(metrics.estimated_remaining_days),
            format!("~{:.2} years", metrics.estimated_remaining_years),
        )
    };
    let rows = vec![
        vec![
            "P/E Cycles Consumed".into(),
            format!("{:.2}", metrics.endurance_cycles_consumed),
            format!("of {rated_cycles}"),
        ],
        vec![
            "Wear Percentage".into(),
            format!("{:.2}%", metrics.wear_fraction_percent),
            wear_status(metrics.wear_fraction_percent).into(),
        ],
        vec!["Estimated Remaining".into(), remaining, years],
        vec![
            "Overall Health".into(),
            String::new(),
            life_status(metrics.estimated_remaining_years).into(),
        ],
    ];

    lines.push(ascii_table(&["Metric", "Value", "Status"], &rows));
    lines.push(String::new());
}

fn methodology(lines: &mut Vec<String>, analysis: &Analysis) {
    section(lines, "CALCULATION METHODOLOGY");

    let metrics = &analysis.metrics;
    let capacity = analysis.params.capacity_gib;
    let rated = analysis.params.rated_endurance_cycles;
    let daily_flash = metrics.daily_write_rate_gib * metrics.write_amplification_factor;
    let lifetime_flash_gib =
        metrics.endurance_cycles_consumed * analysis.params.capacity_bytes() / GIB;

    lines.extend([
        "* WAF = Flash Writes / Host Writes".to_string(),
        format!(
            "  = {:.4} TB / {:.4} TB",
            metrics.flash_bytes_delta / TIB,
            metrics.host_bytes_delta / TIB
        ),
        format!("  = {:.2}", metrics.write_amplification_factor),
        String::new(),
        "* DWPD = Daily Write Rate / Drive Capacity".to_string(),
        format!("  = {:.2} GB/day / {capacity:.2} GB", metrics.daily_write_rate_gib),
        format!("  = {:.4}", metrics.drive_writes_per_day),
        String::new(),
        "* P/E Cycles = Lifetime Host Writes x WAF / Drive Capacity".to_string(),
        format!("  = {lifetime_flash_gib:.2} GB / {capacity:.2} GB"),
        format!("  = {:.2}", metrics.endurance_cycles_consumed),
        String::new(),
        "* Remaining Lifetime = (Rated P/E - Used P/E) x Capacity / Daily Flash Writes"
            .to_string(),
        format!(
            "  = ({rated} - {:.2}) x {capacity:.2} GB / {daily_flash:.2} GB/day",
            metrics.endurance_cycles_consumed
        ),
        format!("  = {}", remaining_days(metrics.estimated_remaining_days)),
        String::new(),
    ]);
}
