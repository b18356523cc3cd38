mod api;
mod app;
mod config;
mod constants;
mod credentials;
mod input;
mod notification;
mod status;
mod ui;

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::Config;
use crate::credentials::CredentialStore;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flowdash=debug"));

    // The terminal is owned by the TUI, so logs go to a file
    let log_file = Config::data_dir()
        .ok()
        .map(|dir| dir.join("flowdash.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"flowdash - terminal dashboard for the FlowPrint service

Usage: flowdash [command]

Commands:
    (none)      Start the dashboard
    setup       Configure server address and dashboard secret
    help        Show this help message

Configuration file: ~/.config/flowdash/config.toml
The dashboard secret can also be supplied via FLOWDASH_SECRET.
"#
    );
}

async fn run_setup() -> Result<()> {
    use std::io::{self, Write};

    println!("FlowDash Setup");
    println!("==============\n");

    let config_path = Config::config_path()?;
    let mut config = if config_path.exists() {
        print!("Configuration already exists. Overwrite? [y/N]: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
        Config::default()
    } else {
        Config::default()
    };

    let url = loop {
        print!("FlowPrint server URL [{}]: ", config.server.url);
        io::stdout().flush()?;
        let mut url = String::new();
        io::stdin().read_line(&mut url)?;
        let url = url.trim().trim_end_matches('/').to_string();

        if url.is_empty() {
            break config.server.url.clone();
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            break url;
        }
        println!("Invalid URL. Please include the scheme (e.g., http://192.168.1.10:5000)");
    };
    config.server.url = url;

    config.ensure_dirs()?;
    config.save()?;
    println!("Configuration saved to {}", config_path.display());

    print!("Dashboard secret (optional, Enter to skip): ");
    io::stdout().flush()?;
    let secret = read_hidden()?;
    println!();

    if secret.is_empty() {
        println!("No secret stored. Destructive actions will not require one.");
    } else {
        let creds = CredentialStore::new();
        creds.store(&secret)?;
        if creds.has_secret() {
            println!("Secret stored successfully.");
        } else {
            eprintln!("Warning: Failed to store the secret.");
            return Err(anyhow::anyhow!("Credential storage failed"));
        }
    }

    println!("\nSetup complete! Run 'flowdash' to start.");
    Ok(())
}

fn read_hidden() -> Result<String> {
    use std::io;

    let _guard = DisableEcho::new()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = std::io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = std::io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup().await,
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            config.ensure_dirs()?;

            crate::ui::theme::init_theme(config.ui.theme);

            let mut app = App::new(config)?;
            app.run().await
        }
    }
}
