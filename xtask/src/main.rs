use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for flycam")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in order
    Check,
    /// Check formatting of every crate
    Fmt,
    /// Lint every target with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the camera basis benchmark in release mode
    Bench,
    /// Launch the desktop viewer, forwarding any extra arguments
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// One cargo invocation, announced before it runs.
struct Step {
    label: &'static str,
    args: Vec<String>,
}

impl Step {
    fn new(label: &'static str, args: &[&str]) -> Self {
        Self {
            label,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn run(&self) -> Result<()> {
        println!("==> cargo {}", self.args.join(" "));
        let status = Command::new(cargo_bin()).args(&self.args).status()?;
        if !status.success() {
            bail!("{} failed ({status})", self.label);
        }
        Ok(())
    }
}

/// The cargo that launched us, so toolchain overrides carry through.
fn cargo_bin() -> String {
    std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string())
}

fn fmt() -> Step {
    Step::new("cargo fmt check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Step {
    Step::new(
        "cargo clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Step {
    Step::new("cargo test", &["test", "--workspace"])
}

fn doc() -> Step {
    Step::new("cargo doc", &["doc", "--workspace", "--no-deps"])
}

fn steps(command: Commands) -> Vec<Step> {
    match command {
        Commands::Check => vec![fmt(), clippy(), test(), doc()],
        Commands::Fmt => vec![fmt()],
        Commands::Clippy => vec![clippy()],
        Commands::Test => vec![test()],
        Commands::Doc => vec![doc()],
        Commands::Build => vec![Step::new("cargo build", &["build", "--workspace"])],
        Commands::Bench => vec![Step::new(
            "camera benchmark",
            &["bench", "-p", "flycam-camera", "--bench", "bench_basis_cache"],
        )],
        Commands::Run { args } => {
            let mut step = Step::new(
                "flycam-desktop",
                &["run", "--release", "-p", "flycam-desktop"],
            );
            if !args.is_empty() {
                step.args.push("--".to_string());
                step.args.extend(args);
            }
            vec![step]
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for step in steps(cli.command) {
        step.run()?;
    }
    Ok(())
}
