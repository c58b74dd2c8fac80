mod cli;
mod config;
mod error;
mod input;
mod logger;
mod manifest;
mod models;
mod pipeline;
mod prompt;
mod summary;
mod target;
mod template;
mod utils;

use crate::cli::Args;
use crate::config::Config;
use crate::error::InitError;
use crate::input::Presets;
use crate::template::TemplateSource;
use crate::utils::ProcessRunner;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if logger::init(logger::level(args.verbose, args.quiet)).is_err() {
        eprintln!("{}: failed to set up logger", "warning".yellow().bold());
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: Args) -> Result<(), InitError> {
    let config = Config::load(args.config.as_deref()).map_err(InitError::Config)?;
    let cwd = std::env::current_dir()?;

    // The prompt session lives until the target is prepared and is dropped on every return path.
    let mut reader = prompt::session();
    let presets = Presets {
        name: args.name.clone(),
        author: args.author.clone(),
        package_manager: args.package_manager,
    };
    let run_config = input::collect(&presets, &config, &cwd, reader.as_mut())?;
    let source = TemplateSource::from_override(args.template.clone().or(config.template_dir.clone()));
    let steps = pipeline::plan(&config, &run_config, source);

    println!("\n{}", "Creating project...".magenta());

    if args.dry_run {
        print_plan(&run_config, &steps);
        return Ok(());
    }

    target::prepare(&run_config.target, reader.as_mut(), args.yes)?;
    drop(reader);

    let mut runner = ProcessRunner::new(!args.quiet);
    pipeline::execute(&steps, &run_config.target.path, &mut runner).await?;

    print!("{}", summary::render(&run_config));
    Ok(())
}

fn print_plan(run_config: &models::RunConfig, steps: &[pipeline::Step]) {
    println!("Dry run: nothing will be written.");
    println!("Target: {}", run_config.target.path.display());
    println!("Package name: {}", run_config.package_name());
    println!("Package manager: {}", run_config.package_manager);
    if target::has_existing_content(&run_config.target) {
        println!(
            "{}",
            "Existing content would be removed after confirmation.".yellow()
        );
    }
    for (index, step) in steps.iter().enumerate() {
        println!("  {}. {}", index + 1, step);
    }
}
