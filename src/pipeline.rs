use crate::config::Config;
use crate::error::{InitError, Result};
use crate::manifest::{self, ManifestFields};
use crate::models::{PackageManager, RunConfig};
use crate::template::{self, TemplateSource};
use crate::utils::{CommandRunner, ResolvedCommand};
use anyhow::Context;
use colored::Colorize;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(NAME|AUTHOR|PACKAGE)\.").expect("placeholder pattern is valid"));

/// Values substituted into command templates.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The name exactly as the user typed it.
    pub project_name: String,
    pub author: String,
    /// Self-mode aware name used for the manifest.
    pub package_name: String,
}

impl From<&RunConfig> for RenderContext {
    fn from(run: &RunConfig) -> Self {
        Self {
            project_name: run.project_name.clone(),
            author: run.author.clone(),
            package_name: run.package_name().to_string(),
        }
    }
}

/// A command line containing `.NAME.`, `.AUTHOR.` or `.PACKAGE.` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Replaces every token in a single pass; substituted text is never rescanned.
    pub fn render(&self, ctx: &RenderContext) -> String {
        PLACEHOLDER
            .replace_all(&self.0, |caps: &Captures<'_>| match &caps[1] {
                "NAME" => ctx.project_name.clone(),
                "AUTHOR" => ctx.author.clone(),
                _ => ctx.package_name.clone(),
            })
            .into_owned()
    }

    /// Renders and splits on whitespace. `None` for a blank template.
    pub fn resolve(&self, ctx: &RenderContext) -> Option<ResolvedCommand> {
        let rendered = self.render(ctx);
        let mut words = rendered.split_whitespace();
        let program = words.next()?;
        Some(ResolvedCommand::new(program, words))
    }
}

/// One setup action. Every variant runs inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CopyTemplate(TemplateSource),
    SetManifestFields(ManifestFields),
    WriteIgnoreFile { file: String, entries: Vec<String> },
    VersionControlInit,
    InstallDependencies {
        package_manager: PackageManager,
        packages: Vec<String>,
    },
    RunFormatter(ResolvedCommand),
    RunHookSetup(ResolvedCommand),
    VersionControlCommit { message: String },
}

impl Step {
    /// Child processes this step spawns, in order.
    pub fn commands(&self) -> Vec<ResolvedCommand> {
        match self {
            Step::CopyTemplate(_) | Step::SetManifestFields(_) | Step::WriteIgnoreFile { .. } => {
                Vec::new()
            }
            Step::VersionControlInit => vec![ResolvedCommand::new("git", ["init"])],
            Step::InstallDependencies {
                package_manager,
                packages,
            } => vec![ResolvedCommand::new(
                package_manager.program(),
                package_manager.install_dev_args(packages),
            )],
            Step::RunFormatter(command) | Step::RunHookSetup(command) => {
                vec![command.clone()]
            }
            Step::VersionControlCommit { message } => vec![
                ResolvedCommand::new("git", ["add", "."]),
                ResolvedCommand::new("git", ["commit", "-m", message.as_str()]),
            ],
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::CopyTemplate(source) => write!(f, "copy {}", source),
            Step::SetManifestFields(fields) => write!(
                f,
                "set {} name=\"{}\" version=\"{}\" author=\"{}\"",
                manifest::MANIFEST_FILE,
                fields.name,
                fields.version,
                fields.author
            ),
            Step::WriteIgnoreFile { file, entries } => {
                write!(f, "write {} ({})", file, entries.join(", "))
            }
            _ => {
                let commands: Vec<String> = self.commands().iter().map(|c| c.to_string()).collect();
                write!(f, "{}", commands.join(" && "))
            }
        }
    }
}

/// Builds the ordered setup plan. The template copy is always first and appears once.
pub fn plan(config: &Config, run: &RunConfig, source: TemplateSource) -> Vec<Step> {
    let ctx = RenderContext::from(run);
    let exec = |template: &str| {
        CommandTemplate::new(template).resolve(&ctx).map(|command| {
            let mut args = vec![command.program];
            args.extend(command.args);
            ResolvedCommand::new(run.package_manager.exec_program(), args)
        })
    };

    let mut steps = vec![
        Step::CopyTemplate(source),
        Step::SetManifestFields(ManifestFields {
            name: ctx.package_name.clone(),
            version: config.manifest_version.clone(),
            author: ctx.author.clone(),
        }),
    ];
    steps.extend(config.ignore_files.iter().map(|file| Step::WriteIgnoreFile {
        file: file.clone(),
        entries: config.ignore_entries.clone(),
    }));
    steps.push(Step::VersionControlInit);
    if !config.dev_dependencies.is_empty() {
        steps.push(Step::InstallDependencies {
            package_manager: run.package_manager,
            packages: config.dev_dependencies.clone(),
        });
    }
    if let Some(command) = exec(&config.formatter) {
        steps.push(Step::RunFormatter(command));
    }
    if let Some(command) = exec(&config.hook_setup) {
        steps.push(Step::RunHookSetup(command));
    }
    steps.push(Step::VersionControlCommit {
        message: config.commit_message.clone(),
    });
    steps
}

/// Runs `steps` in order inside `dir`. The first failure stops the run; nothing is rolled back.
pub async fn execute<R: CommandRunner>(steps: &[Step], dir: &Path, runner: &mut R) -> Result<()> {
    let total = steps.len();
    for (index, step) in steps.iter().enumerate() {
        log::info!("[{}/{}] {}", index + 1, total, step);
        if let Step::InstallDependencies { package_manager, .. } = step {
            println!(
                "{} {}{}\n",
                "Installing dependencies using".yellow(),
                package_manager.to_string().green(),
                "...".yellow()
            );
        }

        match perform(step, dir, runner).await {
            Ok(()) => {}
            Err(source) if matches!(step, Step::CopyTemplate(_)) => {
                return Err(InitError::Template(source));
            }
            Err(source) => {
                return Err(InitError::Step {
                    step: step.to_string(),
                    source,
                });
            }
        }
    }
    Ok(())
}

async fn perform<R: CommandRunner>(step: &Step, dir: &Path, runner: &mut R) -> anyhow::Result<()> {
    match step {
        Step::CopyTemplate(source) => {
            template::materialize(source, dir)?;
        }
        Step::SetManifestFields(fields) => manifest::set_fields(dir, fields)?,
        Step::WriteIgnoreFile { file, entries } => {
            let path = dir.join(file);
            let mut content = entries.join("\n");
            content.push('\n');
            fs::write(&path, content).with_context(|| format!("could not write {}", path.display()))?;
        }
        _ => {
            for command in step.commands() {
                runner.run(&command, dir).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target;
    use anyhow::anyhow;

    /// Records every command and fails the `fail_at`-th one (1-based).
    #[derive(Default)]
    struct RecordingRunner {
        ran: Vec<String>,
        fail_at: Option<usize>,
    }

    impl CommandRunner for RecordingRunner {
        async fn run(&mut self, command: &ResolvedCommand, _cwd: &Path) -> anyhow::Result<()> {
            self.ran.push(command.to_string());
            if self.fail_at == Some(self.ran.len()) {
                return Err(anyhow!("exit status: 1"));
            }
            Ok(())
        }
    }

    fn ctx() -> RenderContext {
        RenderContext {
            project_name: "foo".to_string(),
            author: "bar".to_string(),
            package_name: "foo-pkg".to_string(),
        }
    }

    fn run_config(name: &str, cwd: &Path, package_manager: PackageManager) -> RunConfig {
        RunConfig {
            project_name: name.to_string(),
            author: "bob".to_string(),
            package_manager,
            target: target::resolve(name, cwd).unwrap(),
        }
    }

    #[test]
    fn render_replaces_every_occurrence_and_keeps_whitespace() {
        let template = CommandTemplate::new("echo .NAME.  by .AUTHOR.\t(.NAME./.AUTHOR.) ..NAME");
        assert_eq!(template.render(&ctx()), "echo foo  by bar\t(foo/bar) ..NAME");
    }

    #[test]
    fn render_does_not_rescan_substituted_values() {
        let ctx = RenderContext {
            author: ".NAME.".to_string(),
            ..ctx()
        };
        assert_eq!(CommandTemplate::new(".AUTHOR. .PACKAGE.").render(&ctx), ".NAME. foo-pkg");
    }

    #[test]
    fn resolve_splits_into_program_and_args() {
        let command = CommandTemplate::new("prettier -w ./.NAME./").resolve(&ctx()).unwrap();
        assert_eq!(command, ResolvedCommand::new("prettier", ["-w", "./foo/"]));
        assert!(CommandTemplate::new("   ").resolve(&ctx()).is_none());
    }

    #[test]
    fn plan_copies_template_once_then_runs_fixed_order() {
        let cwd = Path::new("/work");
        let steps = plan(
            &Config::default(),
            &run_config("myapp", cwd, PackageManager::Npm),
            TemplateSource::Embedded,
        );

        assert_eq!(steps[0], Step::CopyTemplate(TemplateSource::Embedded));
        assert_eq!(
            steps.iter().filter(|s| matches!(s, Step::CopyTemplate(_))).count(),
            1
        );
        let rendered: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            rendered[1],
            "set package.json name=\"myapp\" version=\"1.0.0\" author=\"bob\""
        );
        assert!(rendered[2].starts_with("write .gitignore"));
        assert!(rendered[3].starts_with("write .dockerignore"));
        assert_eq!(rendered[4], "git init");
        assert!(rendered[5].starts_with("npm install --save-dev @types/node husky"));
        assert_eq!(rendered[6], "npx prettier --write .");
        assert_eq!(rendered[7], "npx husky");
        assert_eq!(rendered[8], "git add . && git commit -m \"first commit\"");
        assert_eq!(steps.len(), 9);
    }

    #[test]
    fn self_mode_manifest_uses_directory_name() {
        let steps = plan(
            &Config::default(),
            &run_config(".", Path::new("/work/demo-app"), PackageManager::Yarn),
            TemplateSource::Embedded,
        );
        assert!(steps.contains(&Step::SetManifestFields(ManifestFields {
            name: "demo-app".to_string(),
            version: "1.0.0".to_string(),
            author: "bob".to_string(),
        })));
        assert!(steps.contains(&Step::RunHookSetup(ResolvedCommand::new("yarn", ["husky"]))));
    }

    #[test]
    fn blank_commands_and_no_dependencies_are_skipped() {
        let config = Config {
            formatter: String::new(),
            hook_setup: " ".to_string(),
            dev_dependencies: Vec::new(),
            ..Config::default()
        };
        let steps = plan(
            &config,
            &run_config("myapp", Path::new("/work"), PackageManager::Npm),
            TemplateSource::Embedded,
        );
        assert!(!steps.iter().any(|s| matches!(
            s,
            Step::RunFormatter(_) | Step::RunHookSetup(_) | Step::InstallDependencies { .. }
        )));
    }

    #[tokio::test]
    async fn failure_stops_remaining_steps() {
        let dir = tempfile::tempdir().unwrap();
        let steps: Vec<Step> = (1..=7)
            .map(|i| Step::RunFormatter(ResolvedCommand::new("step", [i.to_string()])))
            .collect();
        let mut runner = RecordingRunner {
            fail_at: Some(3),
            ..Default::default()
        };

        let err = execute(&steps, dir.path(), &mut runner).await.unwrap_err();

        assert_eq!(runner.ran, ["step 1", "step 2", "step 3"]);
        match err {
            InitError::Step { step, .. } => assert_eq!(step, "step 3"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn named_run_produces_project_files() {
        let cwd = tempfile::tempdir().unwrap();
        let run = run_config("myapp", cwd.path(), PackageManager::Npm);
        fs::create_dir(&run.target.path).unwrap();
        let steps = plan(&Config::default(), &run, TemplateSource::Embedded);
        let mut runner = RecordingRunner::default();

        execute(&steps, &run.target.path, &mut runner).await.unwrap();

        let manifest: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(run.target.path.join("package.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["name"], "myapp");
        assert_eq!(manifest["version"], "1.0.0");
        assert_eq!(manifest["author"], "bob");
        assert_eq!(
            fs::read_to_string(run.target.path.join(".gitignore")).unwrap(),
            "/node_modules\n/dist\n"
        );
        assert!(run.target.path.join("src/index.ts").is_file());
        assert_eq!(runner.ran.first().map(String::as_str), Some("git init"));
        assert_eq!(
            runner.ran.last().map(String::as_str),
            Some("git commit -m \"first commit\"")
        );
    }

    #[tokio::test]
    async fn template_failure_is_reported_as_template_error() {
        let dir = tempfile::tempdir().unwrap();
        let steps = vec![
            Step::CopyTemplate(TemplateSource::Directory(dir.path().join("missing"))),
            Step::VersionControlInit,
        ];
        let mut runner = RecordingRunner::default();

        let err = execute(&steps, dir.path(), &mut runner).await.unwrap_err();

        assert!(matches!(err, InitError::Template(_)));
        assert!(runner.ran.is_empty());
    }
}
