//! Injectable logging handle.
//!
//! Components receive a [`Logger`] at construction instead of calling the
//! `log` macros directly. By default the handle forwards to whatever backend
//! the binary installed (`env_logger` in the CLI); tests and embedders can
//! route records to their own [`log::Log`] sink.

use std::fmt;
use std::sync::Arc;

use log::{Level, Log, Metadata, Record};

/// Logging capability passed to the segmenter, translator and writer.
#[derive(Clone)]
pub struct Logger {
    sink: Sink,
    target: &'static str,
}

#[derive(Clone)]
enum Sink {
    Global,
    Custom(Arc<dyn Log>),
}

impl Logger {
    /// Forward to the process-wide `log` backend.
    pub fn global() -> Self {
        Self {
            sink: Sink::Global,
            target: "bookweave",
        }
    }

    /// Route records to the given sink.
    pub fn new(sink: Arc<dyn Log>) -> Self {
        Self {
            sink: Sink::Custom(sink),
            target: "bookweave",
        }
    }

    /// Same sink, different record target.
    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    /// Record target used for every message.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Emit a record at the given level.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let sink: &dyn Log = match &self.sink {
            Sink::Global => {
                if level > log::max_level() {
                    return;
                }
                log::logger()
            }
            Sink::Custom(sink) => sink.as_ref(),
        };

        let metadata = Metadata::builder().level(level).target(self.target).build();
        if !sink.enabled(&metadata) {
            return;
        }

        sink.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink {
            Sink::Global => "global",
            Sink::Custom(_) => "custom",
        };
        f.debug_struct("Logger")
            .field("sink", &sink)
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        records: Mutex<Vec<(Level, String, String)>>,
    }

    impl Log for Capture {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.records.lock().unwrap().push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ));
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_custom_sink_receives_records() {
        let capture = Arc::new(Capture::default());
        let logger = Logger::new(capture.clone()).with_target("bookweave::test");

        logger.warn(format_args!("page {} skipped", 3));
        logger.debug(format_args!("detail"));

        let records = capture.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, Level::Warn);
        assert_eq!(records[0].1, "bookweave::test");
        assert_eq!(records[0].2, "page 3 skipped");
        assert_eq!(records[1].0, Level::Debug);
    }

    #[test]
    fn test_global_logger_without_backend_is_silent() {
        // No backend installed: must not panic.
        Logger::global().error(format_args!("nobody listens"));
        assert_eq!(Logger::default().target(), "bookweave");
    }
}
