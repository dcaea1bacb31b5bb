//! `folio` command-line admin for the portfolio content store.
//!
//! # Responsibility
//! - Stand in for the admin UI: list, edit, reorder, export and import content.
//! - Own the consumer-side concerns the store leaves out: admin login gating,
//!   reset confirmation and file read/write.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use folio_core::db::open_db;
use folio_core::{
    export_file_name, init_logging, parse_tags, Achievement, AchievementDraft, AchievementPatch,
    AdminSession, ContentStore, FolioConfig, Project, ProjectDraft, ProjectPatch, ProjectStatus,
    ResetConfirmation, SqliteKvStore,
};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Manage portfolio projects and achievements")]
#[command(version)]
struct Cli {
    /// Database file (overrides FOLIO_DB_PATH)
    #[arg(long, value_name = "FILE", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work with projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Work with achievements
    #[command(subcommand)]
    Achievement(AchievementCommand),
    /// Write a JSON snapshot of all managed content
    Export {
        /// Output file (defaults to portfolio-data-YYYY-MM-DD.json)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Print the snapshot instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Replace content from a JSON snapshot
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show or switch which dataset is presented
    Admin {
        #[arg(value_enum, default_value = "status")]
        action: AdminAction,
    },
    /// Discard all managed content and restore the built-in dataset
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
    /// Start an admin session
    Login {
        #[arg(long)]
        password: String,
    },
    /// End the admin session
    Logout,
    /// Show managed content counts
    Stats,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum AdminAction {
    Status,
    On,
    Off,
    Toggle,
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// List projects in display order
    List {
        /// List admin-managed projects even when admin mode is off
        #[arg(long)]
        managed: bool,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Comma-separated technology labels
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "planned", value_parser = parse_status)]
        status: ProjectStatus,
        #[arg(long)]
        live_url: Option<String>,
        #[arg(long)]
        github_url: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Update fields of a project; pass an empty URL to clear a link
    Update {
        id: String,
        #[command(flatten)]
        fields: ProjectFields,
    },
    Delete {
        id: String,
    },
    /// Move a project to a zero-based display position
    Move {
        id: String,
        position: usize,
    },
}

#[derive(Args)]
struct ProjectFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    tags: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<ProjectStatus>,
    #[arg(long)]
    live_url: Option<String>,
    #[arg(long)]
    github_url: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    order: Option<i64>,
}

#[derive(Subcommand)]
enum AchievementCommand {
    /// List achievements in display order
    List {
        #[arg(long)]
        managed: bool,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        certificate_url: Option<String>,
        #[arg(long)]
        badge_url: Option<String>,
    },
    /// Update fields of an achievement; pass an empty URL to clear a link
    Update {
        id: String,
        #[command(flatten)]
        fields: AchievementFields,
    },
    Delete {
        id: String,
    },
    Move {
        id: String,
        position: usize,
    },
}

#[derive(Args)]
struct AchievementFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    certificate_url: Option<String>,
    #[arg(long)]
    badge_url: Option<String>,
    #[arg(long)]
    order: Option<i64>,
}

type Store<'kv, 'conn> = ContentStore<&'kv SqliteKvStore<'conn>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = FolioConfig::from_env();

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
    ensure_parent_dir(&db_path)?;
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    let kv = SqliteKvStore::new(&conn);
    let session = AdminSession::new(&kv, config.admin_password.clone());
    let mut store = ContentStore::open(&kv)?;

    if cli.command.mutates() && !session.is_authenticated()? {
        bail!("admin login required; run `folio login --password <PASSWORD>` first");
    }

    match cli.command {
        Command::Project(command) => run_project(&mut store, command)?,
        Command::Achievement(command) => run_achievement(&mut store, command)?,
        Command::Export { out, stdout } => {
            let payload = store.export_snapshot()?;
            if stdout {
                println!("{payload}");
            } else {
                let path = out.unwrap_or_else(|| {
                    PathBuf::from(export_file_name(chrono::Utc::now().date_naive()))
                });
                std::fs::write(&path, payload)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("exported to {}", path.display());
            }
        }
        Command::Import { file } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let summary = store.import_snapshot(&payload)?;
            println!(
                "imported projects={} achievements={} admin_mode={}",
                count_label(summary.projects),
                count_label(summary.achievements),
                on_off(summary.admin_mode)
            );
        }
        Command::Admin { action } => {
            match action {
                AdminAction::Status => {}
                AdminAction::On => store.set_admin_mode(true)?,
                AdminAction::Off => store.set_admin_mode(false)?,
                AdminAction::Toggle => {
                    store.toggle_admin_mode()?;
                }
            }
            println!("admin mode {}", on_off(store.is_admin_mode()));
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("reset discards all managed content; re-run with --yes to confirm");
            }
            store.reset_to_default(ResetConfirmation::confirmed())?;
            println!("content reset to built-in defaults; admin mode off");
        }
        Command::Login { password } => {
            if !session.login(&password)? {
                bail!("invalid admin password");
            }
            println!("logged in");
        }
        Command::Logout => {
            session.logout()?;
            println!("logged out");
        }
        Command::Stats => {
            let stats = store.stats();
            println!("projects: {}", stats.projects);
            println!("achievements: {}", stats.achievements);
            println!("admin mode: {}", on_off(stats.admin_mode));
        }
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

impl Command {
    fn mutates(&self) -> bool {
        match self {
            Self::Project(command) => !matches!(command, ProjectCommand::List { .. }),
            Self::Achievement(command) => !matches!(command, AchievementCommand::List { .. }),
            Self::Import { .. } | Self::Reset { .. } => true,
            Self::Admin { action } => !matches!(action, AdminAction::Status),
            Self::Export { .. } | Self::Login { .. } | Self::Logout | Self::Stats => false,
        }
    }
}

fn run_project(store: &mut Store<'_, '_>, command: ProjectCommand) -> anyhow::Result<()> {
    match command {
        ProjectCommand::List { managed } => {
            let projects = if managed {
                store.managed_projects()
            } else {
                store.projects()
            };
            projects.iter().for_each(print_project);
        }
        ProjectCommand::Add {
            title,
            description,
            tags,
            status,
            live_url,
            github_url,
            image_url,
        } => {
            let draft = ProjectDraft {
                title,
                description,
                tags: parse_tags(&tags),
                live_url: non_empty(live_url),
                github_url: non_empty(github_url),
                image_url: non_empty(image_url),
                status,
            };
            let created = store.add_project(draft)?;
            print_project(&created);
        }
        ProjectCommand::Update { id, fields } => {
            let patch = ProjectPatch {
                title: fields.title,
                description: fields.description,
                tags: fields.tags.as_deref().map(parse_tags),
                live_url: link_patch(fields.live_url),
                github_url: link_patch(fields.github_url),
                image_url: link_patch(fields.image_url),
                status: fields.status,
                order: fields.order,
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field flag");
            }
            report_applied("project", &id, "updated", store.update_project(&id, patch)?);
        }
        ProjectCommand::Delete { id } => {
            report_applied("project", &id, "deleted", store.delete_project(&id)?);
        }
        ProjectCommand::Move { id, position } => {
            report_applied("project", &id, "moved", store.move_project(&id, position)?);
        }
    }
    Ok(())
}

fn run_achievement(store: &mut Store<'_, '_>, command: AchievementCommand) -> anyhow::Result<()> {
    match command {
        AchievementCommand::List { managed } => {
            let achievements = if managed {
                store.managed_achievements()
            } else {
                store.achievements()
            };
            achievements.iter().for_each(print_achievement);
        }
        AchievementCommand::Add {
            title,
            description,
            certificate_url,
            badge_url,
        } => {
            let draft = AchievementDraft {
                title,
                description,
                certificate_url: non_empty(certificate_url),
                badge_url: non_empty(badge_url),
            };
            let created = store.add_achievement(draft)?;
            print_achievement(&created);
        }
        AchievementCommand::Update { id, fields } => {
            let patch = AchievementPatch {
                title: fields.title,
                description: fields.description,
                certificate_url: link_patch(fields.certificate_url),
                badge_url: link_patch(fields.badge_url),
                order: fields.order,
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field flag");
            }
            report_applied("achievement", &id, "updated", store.update_achievement(&id, patch)?);
        }
        AchievementCommand::Delete { id } => {
            report_applied("achievement", &id, "deleted", store.delete_achievement(&id)?);
        }
        AchievementCommand::Move { id, position } => {
            report_applied("achievement", &id, "moved", store.move_achievement(&id, position)?);
        }
    }
    Ok(())
}

fn parse_status(value: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`; expected completed|in-progress|planned"))
}

/// Empty input clears the link, anything else replaces it.
fn link_patch(value: Option<String>) -> Option<Option<String>> {
    value.map(|url| Some(url).filter(|url| !url.trim().is_empty()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|url| !url.trim().is_empty())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn report_applied(kind: &str, id: &str, verb: &str, applied: bool) {
    println!("{}", applied_message(kind, id, verb, applied));
}

fn applied_message(kind: &str, id: &str, verb: &str, applied: bool) -> String {
    if applied {
        format!("{kind} {id} {verb}")
    } else {
        format!("no {kind} with id {id}; nothing changed")
    }
}

fn print_project(project: &Project) {
    println!(
        "{:>3}  {}  {}  [{}]  {}",
        project.order,
        project.id,
        project.title,
        project.status.as_str(),
        project.tags.join(", ")
    );
}

fn print_achievement(achievement: &Achievement) {
    println!(
        "{:>3}  {}  {}",
        achievement.order, achievement.id, achievement.title
    );
}

fn count_label(count: Option<usize>) -> String {
    count.map_or_else(|| "unchanged".to_string(), |count| count.to_string())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::{applied_message, link_patch, Cli, Command};
    use clap::Parser;

    #[test]
    fn link_patch_maps_empty_to_clear() {
        assert_eq!(link_patch(None), None);
        assert_eq!(link_patch(Some(" ".to_string())), Some(None));
        assert_eq!(
            link_patch(Some("https://x.dev".to_string())),
            Some(Some("https://x.dev".to_string()))
        );
    }

    #[test]
    fn read_only_commands_do_not_require_login() {
        let list = Cli::try_parse_from(["folio", "project", "list"]).unwrap();
        assert!(!list.command.mutates());

        let status = Cli::try_parse_from(["folio", "admin"]).unwrap();
        assert!(!status.command.mutates());

        let delete = Cli::try_parse_from(["folio", "achievement", "delete", "1"]).unwrap();
        assert!(delete.command.mutates());
        assert!(matches!(delete.command, Command::Achievement(_)));
    }

    #[test]
    fn status_flag_is_validated() {
        assert!(Cli::try_parse_from([
            "folio",
            "project",
            "add",
            "--title",
            "t",
            "--description",
            "d",
            "--status",
            "done",
        ])
        .is_err());
    }

    #[test]
    fn applied_message_names_the_operation() {
        assert_eq!(
            applied_message("project", "3", "deleted", true),
            "project 3 deleted"
        );
        assert_eq!(
            applied_message("achievement", "1", "moved", true),
            "achievement 1 moved"
        );
        assert_eq!(
            applied_message("project", "9", "moved", false),
            "no project with id 9; nothing changed"
        );
    }
}
