//! Drive the scripted mail client.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use triad_demos::{
    mail::Mailbox,
    script::{Demo, Outcome, parse_commands, parse_link, print_command_table},
};

/// CLI flags for the mailer example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Print available commands and exit.
    #[clap(short, long)]
    commands: bool,

    /// Deep link to open, e.g. `message:{"id":2}` or `inbox/message:{"id":3}`.
    #[clap(short, long)]
    link: Option<String>,

    /// Log filter used when RUST_LOG is not set.
    #[clap(long, default_value = "warn")]
    log: String,

    /// Print the backstack after every command.
    #[clap(short, long)]
    verbose: bool,

    /// Commands to run, in order.
    script: Vec<String>,
}

/// Send logs to stderr, filtered by RUST_LOG or `default`.
fn init_logging(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run the mailer example.
pub fn main() -> Result<()> {
    let args = Args::parse();
    if args.commands {
        print_command_table(&mut io::stdout())?;
        return Ok(());
    }
    init_logging(&args.log);

    let link = args.link.as_deref().map(parse_link).transpose()?;
    let commands = parse_commands(&args.script)?;
    let mut demo = Demo::new(Mailbox::sample(), link.as_ref())?;

    let mut out = io::stdout();
    for command in commands {
        println!("> {command}");
        let outcome = demo.run(command)?;
        if args.verbose || outcome == Outcome::Finished {
            demo.print(&mut out)?;
        }
        if outcome == Outcome::Finished {
            println!("finished");
            return Ok(());
        }
    }
    demo.print(&mut out)?;
    for event in demo.mailbox().events() {
        println!("- {event}");
    }
    Ok(())
}
