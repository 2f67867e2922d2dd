//! confkeep command-line entry point

fn main() {
    if let Err(e) = confkeep::cli::run_cli() {
        eprintln!("confkeep: {:#}", e);
        std::process::exit(1);
    }
}
