use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

/// Renders each event as a colored status symbol followed by the
/// message, so log lines match the rest of the terminal output.
pub struct ReactorFormatter;

impl<S, N> FormatEvent<S, N> for ReactorFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let (symbol, color) = match *event.metadata().level() {
            Level::TRACE => ("[ ]", Color::BrightBlack),
            Level::DEBUG => ("[?]", Color::Blue),
            Level::INFO => ("[+]", Color::Green),
            Level::WARN => ("[*]", Color::Yellow),
            Level::ERROR => ("[-]", Color::Red),
        };

        write!(writer, "{} ", symbol.color(color).bold())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(ReactorFormatter)
        .init();
}
