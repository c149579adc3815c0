use clap::Parser;
use colored::Colorize;
use tracing::Level;

mod detect;

const UNDETERMINED: &str = "SORRY, I COULDN'T KNOW WHAT YOU ARE TALKING ABOUT";

/// Guess the natural language a piece of text is written in.
#[derive(Parser, Debug)]
#[command(version)]
struct Options {
    /// The text to classify, quote it to pass more than one word
    text: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let options = Options::parse();
    let text = options.text.unwrap_or_default();

    match detect::detect_language(&text) {
        Some(lang) => println!("{}", lang.eng_name().green()),
        None => println!("{}", UNDETERMINED.red()),
    }

    Ok(())
}
