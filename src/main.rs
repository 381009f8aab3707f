fn main() {
    if let Err(err) = table_sketch::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
