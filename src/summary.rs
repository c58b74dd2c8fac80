use crate::models::RunConfig;
use colored::Colorize;

const AVAILABLE_SCRIPTS: &[(&str, &str)] = &[
    ("dev", "open up a development server"),
    ("open", "shortcut for {pm} run build && {pm} run start"),
    ("build", "build the project"),
    ("start", "start the project"),
    ("compile", "compile the typescript files into javascript"),
    ("compile:watch", "compile the typescript files into javascript on file change"),
    ("lint", "find linting errors in the code"),
    ("lint:fix", "fix linting errors in the code"),
    ("format", "reformat the code using prettier"),
    ("format:all", "reformat all files that prettier supports"),
    ("prepare", "prepare husky hooks"),
    ("post-merge", "install dependencies, format all files and build the project"),
    ("pre-commit", "format all files and build the project"),
];

pub fn next_steps(run: &RunConfig) -> Vec<(String, String)> {
    let mut steps = Vec::new();
    if !run.is_self_mode() {
        steps.push((
            format!("cd {}", run.project_name),
            "change directory to your project".to_string(),
        ));
    }
    steps.push((
        format!("{} run dev", run.package_manager),
        "start the development server".to_string(),
    ));
    steps
}

pub fn render(run: &RunConfig) -> String {
    let steps = next_steps(run);
    let pm = run.package_manager.to_string();
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Setup complete!".green()));
    let heading = if steps.len() > 1 { "Next steps:" } else { "Next step:" };
    out.push_str(&format!("{}\n\n", heading.green()));
    for (command, description) in &steps {
        out.push_str(&format!("- {} = {}\n", command.blue(), description.yellow()));
    }

    out.push_str(&format!("\n{}\n\n", "Available Scripts:".green()));
    for (script, description) in AVAILABLE_SCRIPTS {
        let description = description.replace("{pm}", &pm);
        out.push_str(&format!("- {} = {}\n", script.blue(), description.yellow()));
    }
    out
}
