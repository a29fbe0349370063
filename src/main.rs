use clap::Parser;
use miette::Result;
use capstat::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
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

    match cli.command {
        Commands::Ask(args) => capstat::cli::commands::ask::run(args, &global),
        Commands::Stats(args) => capstat::cli::commands::stats::run(args, &global),
        Commands::Insights(args) => capstat::cli::commands::insights::run(args, &global),
        Commands::Vendor(cmd) => capstat::cli::commands::vendor::run(cmd, &global),
        Commands::Resolve(args) => capstat::cli::commands::resolve::run(args, &global),
        Commands::Completions(args) => capstat::cli::commands::completions::run(args),
    }
}
