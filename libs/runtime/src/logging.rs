use crate::config::LoggingConfig;
use regex::Regex;
use std::{
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendCount, FileLimit},
    ContentLimit, FileRotate,
};

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

// -------- redaction at the sink boundary --------

/// Compiled redaction policy. One pair of patterns per configured field name:
/// `field=value` (tracing's kv format) and `"field": "value"` (JSON payloads
/// echoed into log lines).
#[derive(Clone)]
pub struct Redactor {
    rules: Arc<Vec<(Regex, String)>>,
}

impl Redactor {
    pub fn new(fields: &[String]) -> Self {
        let mut rules = Vec::with_capacity(fields.len() * 2);
        for field in fields {
            let name = regex::escape(field);
            if let Ok(re) = Regex::new(&format!(r#"(?i)("{name}"\s*:\s*)("[^"]*"|[^,\s}}]+)"#)) {
                rules.push((re, "$1\"[redacted]\"".to_string()));
            }
            if let Ok(re) = Regex::new(&format!(r#"(?i)\b({name}=)("[^"]*"|\S+)"#)) {
                rules.push((re, "$1[redacted]".to_string()));
            }
        }
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn apply(&self, line: &str) -> String {
        let mut out = line.to_string();
        for (re, replacement) in self.rules.iter() {
            out = re.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }
}

/// Writer wrapper that scrubs sensitive fields from every formatted record
/// before it reaches the sink.
pub struct RedactingWriter<W: Write> {
    inner: W,
    redactor: Redactor,
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let scrubbed = self.redactor.apply(&text);
        self.inner.write_all(scrubbed.as_bytes())?;
        // Report the original length; the caller's buffer was fully consumed.
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[derive(Clone)]
struct RedactingStdout {
    redactor: Redactor,
}

impl<'a> fmt::MakeWriter<'a> for RedactingStdout {
    type Writer = RedactingWriter<std::io::Stdout>;
    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: std::io::stdout(),
            redactor: self.redactor.clone(),
        }
    }
}

// -------- rotating writer for files --------
#[derive(Clone)]
struct RotWriter {
    rot: Arc<Mutex<FileRotate<AppendCount>>>,
    redactor: Redactor,
}

struct RotWriterHandle {
    rot: Arc<Mutex<FileRotate<AppendCount>>>,
    redactor: Redactor,
}

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let scrubbed = self.redactor.apply(&text);
        self.rot.lock().unwrap().write_all(scrubbed.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.rot.lock().unwrap().flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle {
            rot: self.rot.clone(),
            redactor: self.redactor.clone(),
        }
    }
}

/// Initialize console (+ optional rotating file) logging with the configured
/// redaction policy. `base_dir` anchors relative file paths.
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) {
    let redactor = Redactor::new(&cfg.redact_fields);

    // Route `log` crate records (sea-orm, reqwest internals) into tracing.
    let _ = tracing_log::LogTracer::init();

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if let Some(level) = parse_tracing_level(&cfg.console_level) {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_writer(RedactingStdout {
                    redactor: redactor.clone(),
                })
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level))
                .boxed(),
        );
    }

    if let (Some(file), Some(level)) = (
        cfg.file.as_ref(),
        parse_tracing_level(&cfg.file_level),
    ) {
        let mut path = std::path::PathBuf::from(file);
        if path.is_relative() {
            path = base_dir.join(path);
        }
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let rot = FileRotate::new(
            path,
            AppendCount::new(cfg.max_backups),
            ContentLimit::Bytes((cfg.max_size_mb * 1024 * 1024) as usize),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(RotWriter {
                    rot: Arc::new(Mutex::new(rot)),
                    redactor,
                })
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level))
                .boxed(),
        );
    }

    let _ = tracing_subscriber::registry().with(layers).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_matrix() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("error"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("garbage"), Some(Level::INFO));
    }

    fn redactor() -> Redactor {
        Redactor::new(&[
            "password".to_string(),
            "code".to_string(),
            "newPassword".to_string(),
        ])
    }

    #[test]
    fn redacts_kv_pairs() {
        let out = redactor().apply("login attempt password=hunter2 email=a@b.com");
        assert!(out.contains("password=[redacted]"));
        assert!(out.contains("email=a@b.com"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn redacts_json_fields() {
        let out = redactor().apply(r#"body: {"email":"a@b.com","password":"hunter2","code":"123456"}"#);
        assert!(out.contains(r#""password": "[redacted]""#) || out.contains(r#""password":"[redacted]""#));
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("123456"));
        assert!(out.contains("a@b.com"));
    }

    #[test]
    fn redaction_is_case_insensitive_on_field_names() {
        let out = redactor().apply(r#"{"newpassword": "s3cret"}"#);
        assert!(!out.contains("s3cret"));
    }

    #[test]
    fn lines_without_sensitive_fields_pass_through() {
        let line = "GET /appointments 200 12ms";
        assert_eq!(redactor().apply(line), line);
    }

    #[test]
    fn writer_scrubs_before_sink() {
        let mut sink = Vec::new();
        {
            let mut w = RedactingWriter {
                inner: &mut sink,
                redactor: redactor(),
            };
            w.write_all(b"password=topsecret done").unwrap();
        }
        let written = String::from_utf8(sink).unwrap();
        assert_eq!(written, "password=[redacted] done");
    }
}
