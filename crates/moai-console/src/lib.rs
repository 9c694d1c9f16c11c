//! Colorful console output for compile events.
//!
//! Provides a custom `tracing` layer that formats compiler events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (compile start/end, one line per constraint)
//! - **DEBUG**: Variable family declarations
//! - **TRACE**: Individual skipped index combinations

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use moai_config::LoggingConfig;

static INIT: OnceLock<()> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_DIRECTIVE: &str = "moai_compiler=info";

/// Initializes console output with the default logging configuration.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initializes console output.
///
/// `config.filter` replaces the default directive; `RUST_LOG` still takes
/// precedence over both. Only the first call has effect.
pub fn init_with(config: &LoggingConfig) {
    INIT.get_or_init(|| {
        if config.banner {
            print_banner();
        }

        let filter = EnvFilter::builder()
            .with_default_directive(default_directive(config.filter.as_deref()))
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(CompileConsoleLayer)
            .try_init();
    });
}

// Falls back to plain INFO if a configured directive does not parse.
fn default_directive(filter: Option<&str>) -> Directive {
    filter
        .unwrap_or(DEFAULT_DIRECTIVE)
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}

fn print_banner() {
    let banner = r#"
 __  __  ___    _    ___
|  \/  |/ _ \  / \  |_ _|
| |\/| | | | |/ _ \  | |
| |  | | |_| / ___ \ | |
|_|  |_|\___/_/   \_\___|
"#;

    let version_line = format!("   v{} - MILP model compiler\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats compiler events with colors.
pub struct CompileConsoleLayer;

impl<S: Subscriber> Layer<S> for CompileConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Accept events from compiler crates
        if !metadata.target().starts_with("moai") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    model: Option<String>,
    constraint: Option<String>,
    objective: Option<String>,
    sense: Option<String>,
    set_count: Option<u64>,
    parameter_count: Option<u64>,
    variable_count: Option<u64>,
    constraint_count: Option<u64>,
    instances: Option<u64>,
    skipped: Option<u64>,
    terms: Option<u64>,
    duration_ms: Option<u64>,
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "message" => self.message = Some(value),
            "model" => self.model = Some(value),
            "constraint" => self.constraint = Some(value),
            "objective" => self.objective = Some(value),
            "sense" => self.sense = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_text(field, s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "set_count" => self.set_count = Some(value),
            "parameter_count" => self.parameter_count = Some(value),
            "variable_count" => self.variable_count = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "instances" => self.instances = Some(value),
            "skipped" => self.skipped = Some(value),
            "terms" => self.terms = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "compile_start" => format_compile_start(v),
        "constraint_expanded" => format_constraint_expanded(v),
        "objective_compiled" => format_objective_compiled(v),
        "compile_end" => format_compile_end(v),
        _ if level == Level::WARN => format_warning(v),
        _ => String::new(),
    }
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_compile_start(v: &EventVisitor) -> String {
    format!(
        "{} Compiling {} │ {} sets │ {} parameters │ {} variables │ {} constraints",
        "▶".bright_green().bold(),
        v.model.as_deref().unwrap_or("model").white().bold(),
        count(v.set_count).bright_yellow(),
        count(v.parameter_count).bright_yellow(),
        count(v.variable_count).bright_yellow(),
        count(v.constraint_count).bright_yellow(),
    )
}

fn format_constraint_expanded(v: &EventVisitor) -> String {
    let mut output = format!(
        "  {} {:<24} {:>12} instances",
        "·".bright_blue(),
        v.constraint.as_deref().unwrap_or("?"),
        count(v.instances).bright_magenta(),
    );
    if v.skipped.unwrap_or(0) > 0 {
        output.push_str(&format!(" │ {} skipped", count(v.skipped).bright_black()));
    }
    output
}

fn format_objective_compiled(v: &EventVisitor) -> String {
    format!(
        "  {} {} {} │ {} terms",
        "◆".bright_blue(),
        v.sense.as_deref().unwrap_or("min").bright_cyan(),
        v.objective.as_deref().unwrap_or("objective").white().bold(),
        count(v.terms).bright_magenta(),
    )
}

fn format_compile_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} Compiled {} │ {} instances │ {}",
        "■".bright_cyan().bold(),
        v.model.as_deref().unwrap_or("model").white().bold(),
        count(v.instances).bright_yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    );
    if v.skipped.unwrap_or(0) > 0 {
        output.push_str(&format!(" │ {} skipped", count(v.skipped)));
    }
    output
}

fn format_warning(v: &EventVisitor) -> String {
    let mut output = format!(
        "  {} {}",
        "!".bright_red().bold(),
        v.message.as_deref().unwrap_or("").yellow()
    );
    if let Some(constraint) = &v.constraint {
        output.push_str(&format!(" ({})", constraint));
    }
    output
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(12), "12ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_counts_use_separators() {
        assert_eq!(count(Some(1_234_567)), "1,234,567");
        assert_eq!(count(None), "0");
    }

    #[test]
    fn test_unknown_events_print_nothing() {
        let v = EventVisitor {
            event: Some("solve_start".to_string()),
            ..Default::default()
        };
        assert!(format_event(&v, Level::INFO).is_empty());
    }

    #[test]
    fn test_constraint_line_mentions_skips() {
        let v = EventVisitor {
            event: Some("constraint_expanded".to_string()),
            constraint: Some("balance".to_string()),
            instances: Some(4),
            skipped: Some(2),
            ..Default::default()
        };
        let line = format_event(&v, Level::INFO);
        assert!(line.contains("balance"));
        assert!(line.contains("skipped"));
    }

    #[test]
    fn test_bad_directive_falls_back() {
        let directive = default_directive(Some("moai=[[["));
        assert_eq!(directive.to_string(), "info");
        assert_eq!(default_directive(None).to_string(), DEFAULT_DIRECTIVE);
    }
}
