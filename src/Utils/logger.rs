use crate::numerical::NR::NewtonReport;
use chrono::Local;
use csv::Writer;
use simplelog::*;
use std::error::Error;
use std::fs::File;

/// "debug" | "info" | "warn" | "error"; "off" and "none" disable logging
pub fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Off,
    }
}

/// Install a terminal logger. Returns false if a global logger was already set,
/// in which case the existing one keeps working.
pub fn init_term_logger(level: &str) -> bool {
    let filter = level_filter(level);
    if filter == LevelFilter::Off {
        return false;
    }
    CombinedLogger::init(vec![TermLogger::new(
        filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .is_ok()
}

/// Install a terminal logger and, if `log_to_file`, a file logger writing to
/// `log_<date>_<time>.txt` in the working directory
pub fn init_logger(level: &str, log_to_file: bool) -> Result<(), Box<dyn Error>> {
    let filter = level_filter(level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        loggers.push(WriteLogger::new(filter, Config::default(), File::create(name)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Save the iteration history of a solve: one row per iteration with
/// columns `iteration, residual_norm, x0, x1, ...`
pub fn save_history_to_csv(report: &NewtonReport, filename: &str) -> Result<(), Box<dyn Error>> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    let n = report.root.len();
    let mut headers = vec!["iteration".to_string(), "residual_norm".to_string()];
    headers.extend((0..n).map(|i| format!("x{}", i)));
    writer.write_record(&headers)?;

    for record in &report.history {
        let mut row_data = vec![
            record.iteration.to_string(),
            record.residual_norm.to_string(),
        ];
        row_data.extend(record.x.iter().map(|&val| val.to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}
