fn main() {
    if let Err(err) = lifeline_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
