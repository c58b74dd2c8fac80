use crate::models::PackageManager;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "project-init")]
#[command(about = "Scaffold a ready-to-use TypeScript project from a bundled template")]
#[command(version)]
pub struct Args {
    /// Project name, or `.` to initialize the current directory
    pub name: Option<String>,

    /// Author written into package.json (prompted when omitted)
    #[arg(long)]
    pub author: Option<String>,

    /// Package manager used to install dependencies (prompted when omitted)
    #[arg(short = 'm', long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Copy this directory instead of the bundled template
    #[arg(long, value_name = "DIR")]
    pub template: Option<PathBuf>,

    /// Read configuration from this file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overwrite an existing target without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run: show the setup plan without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,
}
