fn main() {
    if let Err(err) = mindmap_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
