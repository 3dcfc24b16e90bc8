fn main() {
    if let Err(err) = notes_dashboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
