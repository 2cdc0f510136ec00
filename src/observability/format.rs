use chrono::Local;
use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Width of the location column; longer locations keep their rightmost part.
pub const LOCATION_WIDTH: usize = 45;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Pan-Tort log line:
///
/// ```text
/// [INFO]    : 2018-09-14 10:22:01 : pantort::api::services:[88]:tokio-runtime-worker : Hash list parsed count=3
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TortFormatter;

impl<S, N> FormatEvent<S, N> for TortFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let level = format!("[{}]", meta.level());
        let thread = std::thread::current();
        let thread_label = match thread.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", thread.id()),
        };

        write!(
            writer,
            "{:<10}: {} : {} : ",
            level,
            Local::now().format(TIMESTAMP_FORMAT),
            location_column(meta.target(), meta.line(), &thread_label),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `target:[line]:thread`, cut from the left and padded to [`LOCATION_WIDTH`].
pub fn location_column(target: &str, line: Option<u32>, thread: &str) -> String {
    let line = line.map(|l| l.to_string()).unwrap_or_else(|| "?".to_string());
    let full = format!("{target}:[{line}]:{thread}");

    let len = full.chars().count();
    let tail: String = full.chars().skip(len.saturating_sub(LOCATION_WIDTH)).collect();
    format!("{tail:<width$}", width = LOCATION_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn short_location_is_padded() {
        let column = location_column("pantort", Some(7), "main");
        assert_eq!(column.len(), LOCATION_WIDTH);
        assert!(column.starts_with("pantort:[7]:main "));
    }

    #[test]
    fn long_location_keeps_rightmost_characters() {
        let target = "pantort::api::services::some::very::deep::module::path";
        let column = location_column(target, Some(123), "tokio-runtime-worker");
        assert_eq!(column.chars().count(), LOCATION_WIDTH);
        assert!(column.ends_with(":[123]:tokio-runtime-worker"));
    }

    #[test]
    fn formats_full_line() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(TortFormatter)
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 3, query_tag = "t1", "Hash list parsed");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.starts_with("[INFO]    : "), "got: {output}");
        assert!(output.contains(" : Hash list parsed"));
        assert!(output.contains("Hash list parsed count=3 query_tag=\"t1\""), "got: {output:?}");
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn line_has_no_escape_codes() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(TortFormatter)
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(status = 404, url = "http://localhost:5010/", "Server not ready yet");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(!output.contains('\u{1b}'), "got: {output:?}");
        assert!(output.starts_with("[WARN]    : "));
        assert!(output.ends_with(" : Server not ready yet status=404 url=\"http://localhost:5010/\"\n"));
    }
}
