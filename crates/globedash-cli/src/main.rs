use std::process;

mod cli;
mod modes;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}");
        process::exit(1);
    }
}
