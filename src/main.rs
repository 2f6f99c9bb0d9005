use clap::Parser;
use fonds::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE so piping list output to `head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Init(args) => fonds::cli::commands::init::run(args, &global),
        Commands::Import(cmd) => fonds::cli::commands::import::run(cmd, &global),
        Commands::List(args) => fonds::cli::commands::list::run(args, &global),
        Commands::Terms(args) => fonds::cli::commands::terms::run(args, &global),
        Commands::Purge(args) => fonds::cli::commands::purge::run(args, &global),
        Commands::Completions(args) => fonds::cli::commands::completions::run(args),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the flag-derived level
fn init_tracing(global: &GlobalOpts) {
    let level = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
