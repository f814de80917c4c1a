// HomeRun coach
// Terminal entry point

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::Mutex;
use tracing::info;

use homerun_coach::claude::ClaudeClient;
use homerun_coach::coaching::{self, ModuleType};
use homerun_coach::config::{load_settings, Settings};
use homerun_coach::engine::{
    CompletionDetector, EngineSettings, IgnoredReason, Message, PhaseEngine, Role, TurnOutcome,
};
use homerun_coach::gateway::{ClaudeGateway, LlmGateway, OfflineGateway};
use homerun_coach::logging::{init_tracing, TurnLogger};
use homerun_coach::report::ActionPlanService;
use homerun_coach::storage::{FieldFilter, Stores};

#[derive(Parser)]
#[command(name = "homerun")]
#[command(about = "Guided Story, Solution and Success coaching sessions", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive coaching session
    Chat {
        /// story, solution or success
        #[arg(long)]
        module: ModuleType,

        #[arg(long, default_value = "default")]
        project: String,

        /// Continue the newest unfinished session for this project and module
        #[arg(long)]
        resume: bool,
    },
    /// List the reports of a project
    Report {
        #[arg(long)]
        project: String,
    },
    /// Print the project's action plan, compiling it if every module is done
    Plan {
        #[arg(long)]
        project: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings()?;
    let stores = Stores::json_files(&settings.data_dir);

    match cli.command {
        Commands::Chat {
            module,
            project,
            resume,
        } => run_chat(&settings, stores, module, &project, resume).await,
        Commands::Report { project } => list_reports(stores, &project).await,
        Commands::Plan { project } => print_plan(stores, &project).await,
    }
}

fn build_gateway(settings: &Settings) -> Result<Arc<dyn LlmGateway>> {
    match settings.credential() {
        Some(key) => {
            let client = ClaudeClient::new(
                key.to_string(),
                settings.base_url.clone(),
                settings.request_timeout(),
            )
            .context("Failed to create Claude client")?;
            Ok(Arc::new(ClaudeGateway::new(
                client,
                settings.max_tokens,
                settings.request_timeout(),
            )))
        }
        None => {
            eprintln!(
                "No ANTHROPIC_API_KEY configured; running with guided questions only.\n"
            );
            Ok(Arc::new(OfflineGateway))
        }
    }
}

async fn run_chat(
    settings: &Settings,
    stores: Stores,
    module: ModuleType,
    project: &str,
    resume: bool,
) -> Result<()> {
    let gateway = build_gateway(settings)?;
    let engine_settings = EngineSettings::from(settings);

    let previous = if resume {
        stores
            .conversations
            .scan_by_field(&[FieldFilter::project(project), FieldFilter::module(module)])
            .await?
            .into_iter()
            .find(|c| !c.completed)
    } else {
        None
    };
    let resumed = previous.is_some();

    let mut engine = match previous {
        Some(conversation) => {
            PhaseEngine::resume(conversation, gateway, stores.clone(), engine_settings)
        }
        None => PhaseEngine::new(module, project, gateway, stores.clone(), engine_settings),
    };
    if !settings.completion_phrases.is_empty() {
        engine = engine.with_completion_detector(CompletionDetector::with_phrases(
            settings.completion_phrases.iter().cloned(),
        ));
    }

    let turn_log = if settings.turn_log {
        let logger = Arc::new(Mutex::new(TurnLogger::new(settings.turn_log_path())?));
        engine = engine.with_turn_logger(Arc::clone(&logger));
        Some(logger)
    } else {
        None
    };

    println!("{}: {}\n", coaching::role(module), coaching::focus_description(module));
    if resumed {
        if let Some(last) = engine.snapshot().await.last_assistant_message() {
            print_message(last);
        }
    } else {
        for message in engine.initialize().await? {
            print_message(&message);
        }
    }
    println!("(type /done when the draft looks right, /quit to leave)\n");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        match line {
            "/quit" => break,
            "/done" => match engine.complete_module(project).await {
                Ok(report) => {
                    println!("{}", serde_json::to_string_pretty(&report.content)?);
                    let plans = ActionPlanService::new(stores.clone());
                    if plans.plan_for_project(project).await?.is_some() {
                        println!("\nAll three modules are done. Run `homerun plan --project {project}`.");
                    }
                    break;
                }
                Err(e) => eprintln!("{e}"),
            },
            _ => match engine.send_message(line).await {
                TurnOutcome::Completed(turn) => {
                    if let Some(notice) = &turn.notice {
                        eprintln!("! {notice}");
                    }
                    print_message(&turn.reply);
                    if let Some(draft) = &turn.draft {
                        print_message(draft);
                    }
                }
                TurnOutcome::Ignored(IgnoredReason::SessionClosed) => {
                    println!("This module is complete.");
                    break;
                }
                TurnOutcome::Ignored(reason) => info!("Input ignored: {:?}", reason),
            },
        }
    }

    if let Some(logger) = turn_log {
        logger.lock().await.flush().await?;
    }
    Ok(())
}

fn print_message(message: &Message) {
    match message.role {
        Role::Assistant => println!("coach> {}\n", message.content),
        Role::System => println!("[{}]", message.content),
        Role::User => {}
    }
}

async fn list_reports(stores: Stores, project: &str) -> Result<()> {
    let reports = ActionPlanService::new(stores)
        .reports_for_project(project)
        .await?;

    if reports.is_empty() {
        println!("No reports for project {project}");
        return Ok(());
    }
    for report in reports {
        println!(
            "{}  {:<8}  {}",
            report.generated_at.format("%Y-%m-%d %H:%M"),
            report.module_type,
            report.id
        );
    }
    Ok(())
}

async fn print_plan(stores: Stores, project: &str) -> Result<()> {
    match ActionPlanService::new(stores).plan_for_project(project).await? {
        Some(plan) => println!("{}", serde_json::to_string_pretty(&plan)?),
        None => println!("Complete the story, solution and success modules for {project} first."),
    }
    Ok(())
}
