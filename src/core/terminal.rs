use console::{Emoji, style};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_link(label: &str, url: &str) {
    println!(
        "  {} {}: {}",
        GLOBE,
        style(label).bold(),
        style(url).underlined().cyan()
    );
}

pub fn print_banner() {
    println!();
    println!("{}", style("prospect-mcp").bold().cyan());
    println!(
        "{}\n",
        style("Prospect search, scoring and notes behind one tool API.").dim()
    );
}

pub fn print_goodbye() {
    println!("\n{} {}", SPARKLE, style("Server stopped. Bye!").bold().cyan());
}

/// A titled block of `command  description` lines for help output.
pub struct GuideSection {
    title: &'static str,
    rows: Vec<(&'static str, &'static str)>,
}

impl GuideSection {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            rows: Vec::new(),
        }
    }

    pub fn command(mut self, name: &'static str, description: &'static str) -> Self {
        self.rows.push((name, description));
        self
    }

    pub fn print(&self) {
        println!(" {}", style(self.title).bold().underlined());
        let width = self.rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (name, description) in &self.rows {
            let padded = format!("{:<width$}", name, width = width);
            println!("   {}  {}", style(padded).green(), description);
        }
        println!();
    }
}
