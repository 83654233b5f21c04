// Entry point and high-level CLI flow.
//
// The binary mirrors the flow of the original dashboard:
// - Option [1] loads and cleans the service CSV, printing diagnostics.
// - Option [2] generates the sector-wide reports (country comparison,
//   annual trend for a chosen metric, JSON summary).
// - Option [3] generates the per-zone KPI detail for one country.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;

use watsan_report::metrics::Metric;
use watsan_report::types::Observation;
use watsan_report::{loader, output, reports, util};

// Simple in-memory app state so we only load/clean the CSV once but can
// generate reports multiple times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<Observation>>,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt. The prompt is reused for both the main menu and simple numeric
/// inputs.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the report selection menu after
/// generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// The five metrics the original dashboard exposes in its trend selector.
const TREND_METRICS: [Metric; 5] = [
    Metric::MeteringCoverage,
    Metric::NrwPercentage,
    Metric::EcoliPassRate,
    Metric::ComplaintResolutionEfficiency,
    Metric::WwTreatmentCoverage,
];

fn prompt_trend_metric() -> Metric {
    println!("Select metric for the annual trend report:");
    for (i, m) in TREND_METRICS.iter().enumerate() {
        println!("[{}] {}", i + 1, m.label());
    }
    let choice = read_choice();
    match choice.parse::<usize>() {
        Ok(n) if (1..=TREND_METRICS.len()).contains(&n) => TREND_METRICS[n - 1],
        _ => {
            println!("Defaulting to {}.", TREND_METRICS[0].label());
            TREND_METRICS[0]
        }
    }
}

/// Handle option [1]: load and clean the service CSV.
///
/// On success, we store the `Vec<Observation>` in `APP_STATE` and print
/// a short textual summary of what happened.
fn handle_load() {
    let path = "service_data.csv";
    match loader::load_and_clean(path) {
        Ok((data, load_report)) => {
            println!(
                "Processing dataset... ({} rows read, {} observations loaded)",
                util::format_int(load_report.total_rows as i64),
                util::format_int(load_report.loaded_rows as i64)
            );
            if load_report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    util::format_int(load_report.skipped_rows as i64)
                );
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn loaded_data() -> Option<Vec<Observation>> {
    let state = APP_STATE.lock().unwrap();
    state.data.clone()
}

/// Handle option [2]: generate the sector-wide reports.
///
/// This function is intentionally side-effectful:
/// - writes two CSV files and a JSON summary,
/// - and prints Markdown previews of each report to the console.
fn handle_sector_reports() {
    let Some(data) = loaded_data() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let metric = prompt_trend_metric();

    println!("\nGenerating reports...");
    println!("Outputs saved to individual files...\n");

    let comparison = reports::generate_country_comparison(&data);
    let file1 = "report_country_comparison.csv";
    if let Err(e) = output::write_csv(file1, &comparison) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 1: Country Performance Comparison");
    println!("(Service, Production, Access — benchmark-classified means)\n");
    output::preview_table_rows(&comparison, 4);
    println!("(Full table exported to {})\n", file1);

    let trend = reports::generate_annual_trend(&data, metric);
    let file2 = "report_annual_trend.csv";
    if let Err(e) = output::write_csv(file2, &trend) {
        eprintln!("Write error: {}", e);
    }
    println!("Report 2: Annual Trend — {}", metric.label());
    println!("(Grouped by Country and Year)\n");
    output::preview_table_rows(&trend, 8);
    println!("(Full table exported to {})\n", file2);

    let summary = reports::generate_summary(&data);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("Summary Stats (summary.json):");
    println!(
        "Population served: {} | Sector NRW: {} {} | E. Coli pass: {} {}",
        util::format_number(summary.population_served, 0),
        summary
            .avg_nrw_pct
            .map(|v| format!("{:.1}%", v))
            .unwrap_or_else(|| "N/A".to_string()),
        reports::sector_tier(&data, Metric::NrwPercentage)
            .map(|t| t.symbol())
            .unwrap_or("—"),
        summary
            .avg_ecoli_pass_pct
            .map(|v| format!("{:.1}%", v))
            .unwrap_or_else(|| "N/A".to_string()),
        reports::sector_tier(&data, Metric::EcoliPassRate)
            .map(|t| t.symbol())
            .unwrap_or("—"),
    );
    println!(
        "Alerts: {:.1}% of records over 25% NRW, {} low-coverage zones, {} zones below E. Coli target\n",
        summary.alerts.high_nrw_record_pct,
        summary.alerts.low_coverage_zones,
        summary.alerts.poor_quality_zones
    );
}

/// Handle option [3]: per-zone KPI detail for one country.
fn handle_country_detail() {
    let Some(data) = loaded_data() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let country = read_line("Country (cameroon / lesotho / malawi / uganda): ");
    if country.is_empty() {
        println!("No country given.\n");
        return;
    }

    let rows = reports::generate_zone_kpis(&data, &country);
    if rows.is_empty() {
        println!("No data for '{}'.\n", country);
        return;
    }

    let file = "report_zone_kpis.csv";
    if let Err(e) = output::write_csv(file, &rows) {
        eprintln!("Write error: {}", e);
    }
    println!("\nZone KPI Detail — {}\n", country);
    output::preview_table_rows(&rows, 10);
    println!("(Full table exported to {})\n", file);
}

fn main() {
    loop {
        println!("African Water & Sanitation Service Reports");
        println!("[1] Load the file");
        println!("[2] Generate sector reports");
        println!("[3] Country zone detail\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_sector_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!("");
                handle_country_detail();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, or 3.\n");
            }
        }
    }
}
