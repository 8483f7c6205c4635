//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the `sabor` CLI. All
//! chat output goes to stdout; logs go to stderr.

use crate::session::SessionStats;
use crate::types::{QueryResult, SourceRef};
use crate::utils::toml_config::AssistantConfig;
use owo_colors::OwoColorize;
use std::io::{self, Write};

const RULE_WIDTH: usize = 70;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// `1 - distance` as a percentage string, e.g. `87.50%`.
pub fn similarity_percent(distance: f32) -> String {
    format!("{:.2}%", (1.0 - distance as f64) * 100.0)
}

/// One line per source: `1. menu.txt (chunk 0) - similitud: 87.50%`.
pub fn format_source_line(position: usize, source: &SourceRef) -> String {
    format!(
        "{}. {} (chunk {}) - similitud: {}",
        position,
        source.source,
        source.chunk_index,
        similarity_percent(source.distance)
    )
}

/// `📊 Tokens: 250 | Costo: $0.000040 | Tiempo: 1.20s`
pub fn format_usage_line(result: &QueryResult) -> String {
    format!(
        "📊 Tokens: {} | Costo: ${:.6} | Tiempo: {:.2}s",
        result.tokens_used,
        result.cost,
        result.total_time.as_secs_f64()
    )
}

/// Thousands separator with commas.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn rule(&self, ch: &str) {
        if self.colored {
            println!("{}", ch.repeat(RULE_WIDTH).dimmed());
        } else {
            println!("{}", ch.repeat(RULE_WIDTH));
        }
    }

    /// Print the chat banner
    pub fn banner(&self, assistant: &AssistantConfig) {
        let title = format!(
            "CHATBOT RESTAURANTE {}",
            assistant.restaurant_name.to_uppercase()
        );

        println!();
        self.rule("=");
        if self.colored {
            println!("{:^width$}", title.bright_yellow().bold(), width = RULE_WIDTH);
        } else {
            println!("{:^width$}", title, width = RULE_WIDTH);
        }
        self.rule("=");

        println!("\n Restaurante ubicado en {}", assistant.city);
        println!(" WhatsApp: {}", assistant.contact_phone);
        println!("\n Puedes preguntar sobre:");
        for topic in [
            "Menú y precios",
            "Horarios de atención",
            "Servicio de domicilios",
            "Reservas y políticas",
            "Preguntas frecuentes",
        ] {
            self.list_item(topic);
        }
        println!("\n Comandos especiales:");
        self.list_item("'salir' - Terminar");
        self.list_item("'stats' - Ver estadísticas acumuladas");
        self.list_item("'ayuda' - Ver esta ayuda");
        println!();
        self.rule("=");
    }

    /// Print the in-chat help
    pub fn chat_help(&self) {
        println!();
        self.rule("=");
        self.title(" AYUDA - COMANDOS DISPONIBLES");
        self.rule("=");
        println!("\n Para chatear:");
        println!("   Simplemente escribe tu pregunta y presiona Enter");
        println!("\n Comandos especiales:");
        self.list_item("salir - Terminar el programa");
        self.list_item("stats - Ver estadísticas de uso (tokens, costo)");
        self.list_item("ayuda - Mostrar esta ayuda");
        println!("\n Ejemplos de preguntas:");
        for example in [
            "¿Cuánto cuesta el ajiaco?",
            "¿Cuál es el horario de atención?",
            "¿Hacen domicilios?",
            "¿Tienen opciones vegetarianas?",
            "¿Aceptan tarjeta de crédito?",
        ] {
            self.list_item(example);
        }
        println!();
        self.rule("=");
    }

    /// Print accumulated session usage
    pub fn session_stats(&self, stats: &SessionStats) {
        println!();
        self.rule("=");
        self.title(" ESTADÍSTICAS DE LA SESIÓN");
        self.rule("=");
        println!("\n Consultas realizadas: {}", stats.total_queries);
        println!(" Consultas exitosas: {}", stats.successful_queries);
        println!(" Consultas con error: {}", stats.failed_queries);

        if let (Some(avg_time), Some(avg_cost)) = (stats.avg_time(), stats.avg_cost()) {
            println!(
                "\n Tiempo promedio por consulta: {:.2}s",
                avg_time.as_secs_f64()
            );
            println!(" Tokens totales usados: {}", group_thousands(stats.total_tokens));
            println!(" Costo total: ${:.6} USD", stats.total_cost);
            println!(" Costo promedio por consulta: ${:.6} USD", avg_cost);
        }
        println!();
        self.rule("=");
    }

    /// Print an answer with its sources and usage line
    pub fn answer(&self, restaurant_name: &str, result: &QueryResult, show_sources: bool) {
        let speaker = format!("\n {}:", restaurant_name);
        if self.colored {
            println!("{}", speaker.bright_green().bold());
        } else {
            println!("{}", speaker);
        }
        self.rule("-");
        println!("{}", result.answer);
        self.rule("-");

        if show_sources && !result.sources.is_empty() {
            println!("\nFuentes consultadas:");
            for (i, source) in result.sources.iter().enumerate() {
                let line = format_source_line(i + 1, source);
                if self.colored {
                    println!("   {}", line.dimmed());
                } else {
                    println!("   {}", line);
                }
            }
        }

        println!("\n{}", format_usage_line(result));
    }

    /// Print the input prompt without a newline
    pub fn prompt(&self) {
        if self.colored {
            print!("\n {} ", "Tu:".bright_cyan().bold());
        } else {
            print!("\n Tu: ");
        }
        io::stdout().flush().ok();
    }

    fn title(&self, text: &str) {
        if self.colored {
            println!("{}", text.bright_white().bold());
        } else {
            println!("{}", text);
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result() -> QueryResult {
        QueryResult {
            query: "¿Cuánto cuesta el ajiaco?".to_string(),
            answer: "El ajiaco cuesta $12.000 COP.".to_string(),
            sources: vec![SourceRef {
                source: "menu.txt".to_string(),
                chunk_index: 0,
                distance: 0.125,
            }],
            model: "gpt-4o-mini".to_string(),
            tokens_used: 250,
            cost: 0.00004,
            total_time: Duration::from_millis(1200),
            error: None,
        }
    }

    #[test]
    fn test_similarity_percent() {
        assert_eq!(similarity_percent(0.125), "87.50%");
        assert_eq!(similarity_percent(0.0), "100.00%");
        assert_eq!(similarity_percent(1.5), "-50.00%");
    }

    #[test]
    fn test_format_source_line() {
        let r = result();
        assert_eq!(
            format_source_line(1, &r.sources[0]),
            "1. menu.txt (chunk 0) - similitud: 87.50%"
        );
    }

    #[test]
    fn test_format_usage_line() {
        assert_eq!(
            format_usage_line(&result()),
            "📊 Tokens: 250 | Costo: $0.000040 | Tiempo: 1.20s"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_output_methods_no_panic() {
        let assistant = AssistantConfig::default();
        let mut stats = SessionStats::new();
        stats.record(&result());

        for output in [Output::no_color(), Output::new()] {
            output.banner(&assistant);
            output.chat_help();
            output.session_stats(&SessionStats::new());
            output.session_stats(&stats);
            output.answer(&assistant.restaurant_name, &result(), true);
            output.success("ok");
            output.info("info");
            output.warning("warn");
            output.error("error");
            output.header("Header");
            output.kv("key", "value");
        }
    }
}
