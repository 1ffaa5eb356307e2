use clap::Parser;
use herald::{config::RegistryConfig, Error, Event, EventRegistry, EventType, Listener};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "herald.json")]
    config: PathBuf,

    /// Who to greet
    #[arg(short, long, default_value = "world")]
    name: String,

    /// File to write the greeting to; a file_saved event follows the write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

fn register_listeners(registry: &EventRegistry) -> Result<(), Error> {
    registry.subscribe(
        EventType::Greet,
        Listener::new(|event: &Event| {
            if let Event::Greet { name } = event {
                println!("Hello, {}!", name);
            }
            Ok(())
        }),
    )?;
    registry.subscribe(
        EventType::FileOpened,
        Listener::new(|event: &Event| {
            if let Event::FileOpened { path } = event {
                println!("File opened: {}", path.display());
            }
            Ok(())
        }),
    )?;
    registry.subscribe(
        EventType::FileSaved,
        Listener::new(|event: &Event| {
            if let Event::FileSaved { path, bytes } = event {
                println!("File saved: {} ({} bytes)", path.display(), bytes);
            }
            Ok(())
        }),
    )?;
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = if cli.config.exists() {
        RegistryConfig::from_file(&cli.config)?
    } else {
        RegistryConfig::default()
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let registry = EventRegistry::with_config(config);
    register_listeners(&registry)?;

    let path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("newfile.txt"));
    let mut events = vec![Event::FileOpened { path: path.clone() }];

    if let Some(output) = &cli.output {
        let content = format!("Hello, {}!\n", cli.name);
        std::fs::write(output, &content)
            .map_err(|e| Error::internal(format!("Failed to write {}: {}", output.display(), e)))?;
        events.push(Event::FileSaved {
            path: output.clone(),
            bytes: content.len(),
        });
    } else {
        events.push(Event::FileSaved { path, bytes: 0 });
    }
    events.push(Event::Greet {
        name: cli.name.clone(),
    });

    for event in &events {
        let invoked = registry.emit(event)?;
        info!(event_type = %event.event_type(), invoked, "event emitted");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
