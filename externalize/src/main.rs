use clap::Parser;

use externalize::args::Cli;

fn main() {
    let cli = Cli::parse();
    externalize::logging::init(cli.verbose);
    let cwd = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    let code = match externalize::run::run(&cli, &cwd) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("externalize: {err}");
            1
        }
    };
    std::process::exit(code);
}
