mod app;
mod input;
mod render;
mod term;

use std::fs::File;

use movement_core::PresetBank;

use app::App;
use term::TerminalBackend;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("movement")
        .join("movement.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path)
        .unwrap_or_else(|_| File::create("/tmp/movement.log").expect("Cannot create log file"));

    WriteLogger::init(log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("movement starting (log level: {:?})", log_level);
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let virtual_ports = args.iter().any(|a| a == "--virtual");
    let port: Option<usize> = args
        .iter()
        .position(|a| a == "--port")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok());

    let bank = match PresetBank::builtin() {
        Ok(bank) => bank,
        Err(e) => {
            eprintln!("broken preset table: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(bank);
    app.connect_midi(port, virtual_ports);

    let mut backend = TerminalBackend::new()?;
    backend.start()?;

    let result = app.run(&mut backend);

    backend.stop()?;
    result
}
