fn main() {
    if let Err(err) = pathway_viz::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
