#[tokio::main]
async fn main() {
    if let Err(e) = pgfilter_cli::run(std::env::args().collect()).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
