//! TaskEase CLI - a personal task list with AI-assisted titles and priorities.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::disallowed_macros)]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use taskease::ai::{PromptService, ProviderPromptService};
use taskease::auth::{AuthClient, LocalAuth};
use taskease::domain::{AIDomain, ConfigDomain, TasksDomain};
use taskease::entities::{partition, Identity, ModelSettings, Task};
use taskease::errors::TaskEaseError;
use taskease::storage::{LocalStore, TaskStore};
use taskease::ui;

#[derive(Parser)]
#[command(name = "taskease")]
#[command(about = "A personal task list with AI-assisted titles and priorities", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        email: String,
        password: String,
    },

    /// Sign in to an existing account
    Login {
        email: String,
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List tasks, active first
    List,

    /// Show details of a specific task
    Show {
        /// Task ID or unique prefix
        id: String,
    },

    /// Change a task's title and description
    Edit {
        /// Task ID or unique prefix
        id: String,

        /// New title
        #[arg(short, long)]
        title: String,

        /// New description; omit to clear it
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Mark a task completed, or active again
    Toggle {
        /// Task ID or unique prefix
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Suggest titles for a description
    Suggest {
        /// Free-text task description
        description: String,
    },

    /// Ask the model to prioritize the active tasks
    Prioritize {
        /// Save the priorities instead of only showing them
        #[arg(long)]
        save: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the current configuration
    Show,

    /// Set the model used for AI features
    SetModel {
        /// Model in the form provider:model_id
        model: String,

        /// Sampling temperature (0.0 - 1.0)
        #[arg(long)]
        temperature: Option<f32>,

        /// Base URL override for the provider API
        #[arg(long)]
        base_url: Option<String>,
    },
}

fn get_project_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let project_path = get_project_path(cli.project.clone());

    // RUST_LOG wins over the configured level
    let log_level = ConfigDomain::new(&project_path)
        .load()
        .await
        .map_or_else(|_| "warn".to_string(), |config| config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    if let Err(e) = run(cli, project_path).await {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, project_path: PathBuf) -> Result<(), TaskEaseError> {
    let auth = LocalAuth::open(&project_path).await?;
    let store: Arc<dyn TaskStore> = Arc::new(LocalStore::open(&project_path).await?);
    let tasks_domain = TasksDomain::new(Arc::clone(&store));
    let config_domain = ConfigDomain::new(&project_path);

    match cli.command {
        Commands::Signup { email, password } => {
            let identity = auth.create_account(&email, &password).await?;
            ui::print_success(&format!("Account created. Signed in as {}", identity.email));
        }

        Commands::Login { email, password } => {
            let identity = auth.sign_in(&email, &password).await?;
            ui::print_success(&format!("Signed in as {}", identity.email));
        }

        Commands::Logout => {
            auth.sign_out().await?;
            ui::print_success("Signed out");
        }

        Commands::Whoami => match auth.current() {
            Some(identity) => println!("{identity}"),
            None => ui::print_info("Not signed in"),
        },

        Commands::Add { title, description } => {
            let owner = signed_in(&auth)?;
            let task = tasks_domain.add_task(&owner, title, description).await?;
            ui::print_success(&format!(
                "Created task {} - {}",
                ui::short_id(&task.id),
                task.title
            ));
        }

        Commands::List => {
            let owner = signed_in(&auth)?;
            let tasks = tasks_domain.list_tasks(&owner).await?;

            if tasks.is_empty() {
                ui::print_info("No tasks yet. Add one with `taskease add <title>`");
            } else {
                let (active, completed) = partition(&tasks);
                println!("{}", "Active".bold().underline());
                if active.is_empty() {
                    ui::print_info("Nothing left to do");
                } else {
                    println!("{}", ui::task_table(&active));
                }
                if !completed.is_empty() {
                    println!();
                    println!("{}", "Completed".bold().underline());
                    println!("{}", ui::task_table(&completed));
                }
                println!();
                ui::print_info(&format!(
                    "{} active, {} completed",
                    active.len(),
                    completed.len()
                ));
            }
        }

        Commands::Show { id } => {
            let owner = signed_in(&auth)?;
            let task = resolve_task(&tasks_domain, &owner, &id).await?;
            ui::display_task_details(&task);
        }

        Commands::Edit {
            id,
            title,
            description,
        } => {
            let owner = signed_in(&auth)?;
            let task = resolve_task(&tasks_domain, &owner, &id).await?;
            tasks_domain
                .edit_task(&owner, &task.id, title, description)
                .await?;
            ui::print_success(&format!("Updated task {}", ui::short_id(&task.id)));
        }

        Commands::Toggle { id } => {
            let owner = signed_in(&auth)?;
            let task = resolve_task(&tasks_domain, &owner, &id).await?;
            let completed = tasks_domain.toggle_complete(&owner, &task).await?;
            let state = if completed { "completed" } else { "active" };
            ui::print_success(&format!("Marked '{}' as {state}", task.title));
        }

        Commands::Delete { id, yes } => {
            let owner = signed_in(&auth)?;
            let task = resolve_task(&tasks_domain, &owner, &id).await?;

            if !yes {
                ui::print_warning(&format!(
                    "About to delete '{}'. Use --yes to confirm.",
                    task.title
                ));
                return Ok(());
            }

            tasks_domain.delete_task(&owner, &task.id).await?;
            ui::print_success(&format!("Deleted '{}'", task.title));
        }

        Commands::Suggest { description } => {
            let ai_domain = ai_domain(&config_domain, Arc::clone(&store)).await?;
            let titles = ai_domain.suggest_titles(&description).await?;

            if titles.is_empty() {
                ui::print_info("No suggestions");
            } else {
                println!("{}", "Suggested titles".bold().underline());
                for (i, title) in titles.iter().enumerate() {
                    println!("  {}. {title}", i + 1);
                }
            }
        }

        Commands::Prioritize { save } => {
            let owner = signed_in(&auth)?;
            let tasks = tasks_domain.list_tasks(&owner).await?;
            let ai_domain = ai_domain(&config_domain, Arc::clone(&store)).await?;

            ui::print_info("Asking the model to prioritize your active tasks...");
            let proposal = ai_domain.prioritize(&tasks).await?;

            if proposal.is_empty() {
                ui::print_warning("The model returned no priorities");
                return Ok(());
            }
            println!("{}", ui::proposal_table(proposal.records()));

            if save {
                let report = ai_domain.save_priorities(&owner, &proposal).await?;
                ui::print_success(&format!(
                    "Saved priorities for {} task(s)",
                    report.updated.len()
                ));
                if !report.skipped.is_empty() {
                    ui::print_warning(&format!(
                        "No task matched: {}",
                        report.skipped.join(", ")
                    ));
                }
            } else {
                ui::print_info("Run again with --save to keep these priorities");
            }
        }

        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => {
                let config = config_domain.load().await?;

                println!("{}", "Configuration".bold().underline());
                println!();
                println!(
                    "  {}: {}:{}",
                    "Model".cyan(),
                    config.ai.provider,
                    config.ai.model_id
                );
                println!("  {}: {}", "Max tokens".cyan(), config.ai.max_tokens);
                println!("  {}: {}", "Temperature".cyan(), config.ai.temperature);
                match &config.ai.base_url {
                    Some(url) => println!("  {}: {url}", "Base URL".cyan()),
                    None => println!("  {}: {}", "Base URL".cyan(), "default".dimmed()),
                }
                println!("  {}: {}", "Log level".cyan(), config.log_level);
                if let Some(name) = &config.app_name {
                    println!("  {}: {name}", "App name".cyan());
                }
                println!();
                ui::print_info(&format!(
                    "Loaded from {}",
                    config_domain.config_path().display()
                ));
            }

            ConfigCommands::SetModel {
                model,
                temperature,
                base_url,
            } => {
                let current = config_domain.load().await?.ai;
                let mut settings = parse_model_string(&model, &current)?;
                if let Some(t) = temperature {
                    settings.temperature = t;
                }
                if base_url.is_some() {
                    settings.base_url = base_url;
                }
                config_domain.set_model(settings).await?;
                ui::print_success(&format!("Set model to: {model}"));
            }
        },
    }

    Ok(())
}

fn signed_in(auth: &LocalAuth) -> Result<Identity, TaskEaseError> {
    auth.current().ok_or(TaskEaseError::NotSignedIn)
}

/// Find a task by full id or by a prefix matching exactly one task
async fn resolve_task(
    tasks_domain: &TasksDomain,
    owner: &Identity,
    id: &str,
) -> Result<Task, TaskEaseError> {
    let tasks = tasks_domain.list_tasks(owner).await?;
    if let Some(task) = tasks.iter().find(|t| t.id == id) {
        return Ok(task.clone());
    }

    let mut matches = tasks.into_iter().filter(|t| t.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task),
        (Some(_), Some(_)) => Err(TaskEaseError::InvalidArgument {
            reason: format!("'{id}' matches more than one task"),
        }),
        (None, _) => Err(TaskEaseError::TaskNotFound {
            task_id: id.to_string(),
        }),
    }
}

async fn ai_domain(
    config_domain: &ConfigDomain,
    store: Arc<dyn TaskStore>,
) -> Result<AIDomain, TaskEaseError> {
    let config = config_domain.load().await?;
    let service = ProviderPromptService::from_settings(&config.ai)?;
    if !service.is_configured() {
        return Err(TaskEaseError::Ai(format!(
            "{} provider is not configured; set {}",
            service.provider_name(),
            service.api_key_env_var()
        )));
    }
    let prompts: Arc<dyn PromptService> = Arc::new(service);
    Ok(AIDomain::new(store, prompts))
}

fn parse_model_string(s: &str, current: &ModelSettings) -> Result<ModelSettings, TaskEaseError> {
    let Some((provider, model_id)) = s.split_once(':') else {
        return Err(TaskEaseError::InvalidArgument {
            reason: "Model string must be in format 'provider:model_id'".to_string(),
        });
    };

    Ok(ModelSettings {
        provider: provider.to_string(),
        model_id: model_id.to_string(),
        ..current.clone()
    })
}
