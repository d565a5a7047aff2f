use anyhow::Context as _;
use dotenvy::dotenv;
use glm_vision::config::Settings;
use glm_vision::plugin::{EventContext, PluginChain, VisionPlugin};
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting credentials from log output
struct RedactionPatterns {
    bearer: Regex,
    zhipu_key: Regex,
    env_key: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bearer: Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._\-]+")?,
            zhipu_key: Regex::new(r"\b[0-9a-f]{32}\.[A-Za-z0-9]{16}\b")?,
            env_key: Regex::new(r"(GLM_VISION__API__KEY=)[^\s&]+")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let output = self.bearer.replace_all(input, "${1}[API_KEY]");
        let output = self.zhipu_key.replace_all(&output, "[API_KEY]");
        self.env_key
            .replace_all(&output, "${1}[MASKED]")
            .into_owned()
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // Report the original length; the redacted text may be shorter or longer.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    const fn new(make_inner: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            make_inner,
            patterns,
        }
    }
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let patterns = Arc::new(RedactionPatterns::new().context("Failed to compile regex patterns")?);
    init_logging(patterns);

    info!("Starting GLM vision console host...");

    let settings = init_settings();
    let plugin = VisionPlugin::new(settings).context("Failed to initialize plugin")?;

    let mut chain = PluginChain::new();
    chain.register(Arc::new(plugin));

    println!("{}", chain.help_text());
    run_console(&chain).await
}

fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter::new(io::stderr, patterns);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Treat every stdin line as an inbound text message until EOF.
async fn run_console(chain: &PluginChain) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "help" {
            println!("{}", chain.help_text());
            continue;
        }

        let mut ctx = EventContext::text(line);
        chain.dispatch(&mut ctx).await;
        match ctx.reply {
            Some(reply) => println!("{reply}"),
            None => info!("No plugin handled the message"),
        }
    }

    info!("Input closed, shutting down.");
    Ok(())
}
