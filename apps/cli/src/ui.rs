use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn print_header(subtitle: &str) {
    println!(
        "\n{}  {}\n",
        style("konspekt").cyan().bold(),
        style(subtitle).dim()
    );
}

pub fn print_rule() {
    println!("{}", style("─".repeat(60)).dim());
}

pub fn print_error(err: impl std::fmt::Display) {
    eprintln!("{} {}", style("Error:").red().bold(), err);
}

pub fn check() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
