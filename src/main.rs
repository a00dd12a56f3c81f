use std::io::{self, Write};
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use provctl::cli::commands::{print_usage, run};
use provctl::cli::{output, Cli};
use provctl::config::Settings;
use provctl::exitcode;
use provctl::infrastructure::di::ServiceContainer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // wrong argument count, unknown flag or no operation at all
            let _ = print_usage(&mut io::stdout());
            if e.kind() != ErrorKind::MissingRequiredArgument {
                let _ = e.print();
            }
            process::exit(exitcode::USAGE);
        }
    };

    setup_logging(cli.debug);

    let settings = match Settings::load() {
        Ok(settings) => settings.with_overrides(cli.control_dir.clone(), cli.strict),
        Err(e) => {
            output::error(&e);
            process::exit(exitcode::CONFIG);
        }
    };
    let strict = settings.strict;
    tracing::debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(settings);
    let mut stdout = io::stdout().lock();
    let result = run(&cli, &container, &mut stdout);
    let _ = stdout.flush();

    if let Err(e) = result {
        output::error(&e);
        if e.shows_usage() {
            let _ = print_usage(&mut stdout);
        }
        process::exit(e.exit_code(strict));
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
