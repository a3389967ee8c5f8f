use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    println!("warden v{}, by {}", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));

    let args: Vec<String> = std::env::args().collect();

    // Launches a perft test
    if args.get(1).map(String::as_str) == Some("perft") {
        let expected_format = "Expected : perft <depth> [<FEN>]";
        let depth = match args.get(2).and_then(|d| d.parse::<u32>().ok()) {
            Some(d) => d,
            None => {
                eprintln!("{}", expected_format);
                std::process::exit(2);
            }
        };
        let fen = args.get(3).cloned();

        if let Err(e) = warden::perft(depth, fen, num_cpus::get()) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    } else {
        warden::console::Console::default().run()
    }
}
