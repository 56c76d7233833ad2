use std::fmt::Write as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unicompass_core::completion::{completion_percent, missing_fields};
use unicompass_core::{TodoInput, TodoPatch, TodoStatus};

use unicompass::cli::{Cli, Command, ProfileAction, TodoAction, UniversityAction};
use unicompass::views::{application, dashboard, stage_bar, universities};
use unicompass::{ApiClient, CatalogFilters, ClientError, SessionStore};

const NOT_SIGNED_IN: &str = "Not signed in. Run `unicompass login` first.";
const NOT_ONBOARDED: &str = "Complete onboarding first: run `unicompass profile set ...`.";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=warn", env!("CARGO_CRATE_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = SessionStore::new(&cli.session_file);
    let session = store.hydrate();
    debug!(
        "Using {} (signed in: {})",
        cli.api_url,
        session.is_authenticated()
    );
    let client = ApiClient::new(cli.api_url, session, Some(store));

    match run(&client, cli.command).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn require_session(client: &ApiClient) -> Result<(), ClientError> {
    if client.session().await.is_authenticated() {
        Ok(())
    } else {
        Err(ClientError::Precondition(NOT_SIGNED_IN.to_string()))
    }
}

async fn run(client: &ApiClient, command: Command) -> Result<String, ClientError> {
    let public = matches!(
        command,
        Command::Register { .. } | Command::Login { .. } | Command::Logout
    );
    if !public {
        require_session(client).await?;
    }

    match command {
        Command::Register {
            email,
            password,
            name,
        } => {
            let user = client.register(&email, &password, &name).await?;
            Ok(format!(
                "Account created for {}. Run `unicompass login` to continue.\n",
                user.email
            ))
        }
        Command::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            let next = if user.is_onboarded {
                "Run `unicompass dashboard` to see your progress."
            } else {
                NOT_ONBOARDED
            };
            Ok(format!("Signed in as {}. {next}\n", user.full_name))
        }
        Command::Logout => {
            let who = client.current_user().await;
            client.logout().await;
            Ok(match who {
                Some(user) => format!("Signed out {}.\n", user.email),
                None => "Signed out.\n".to_string(),
            })
        }
        Command::Whoami => {
            let user = client.refresh_user().await?;
            Ok(format!(
                "{} <{}>\n{}\n",
                user.full_name,
                user.email,
                stage_bar(user.current_stage)
            ))
        }
        Command::Profile { action } => match action {
            ProfileAction::Show => match client.get_profile().await? {
                Some(profile) => {
                    let mut out = format!("Profile completion: {}%\n", completion_percent(&profile));
                    let missing = missing_fields(&profile);
                    if !missing.is_empty() {
                        let _ = writeln!(out, "Missing: {}", missing.join(", "));
                    }
                    let json = serde_json::to_string_pretty(&profile)
                        .map_err(|e| ClientError::Decode(e.to_string()))?;
                    let _ = writeln!(out, "{json}");
                    Ok(out)
                }
                None => Ok(format!("No profile yet. {NOT_ONBOARDED}\n")),
            },
            ProfileAction::Set(args) => {
                let profile = client.save_profile(&args.into()).await?;
                Ok(format!(
                    "Profile saved ({}% complete).\n",
                    completion_percent(&profile)
                ))
            }
        },
        Command::Dashboard => {
            let user = client.refresh_user().await?;
            if !user.is_onboarded {
                return Err(ClientError::Precondition(NOT_ONBOARDED.to_string()));
            }
            let data = dashboard::load(client).await;
            Ok(dashboard::render(&user, &data))
        }
        Command::Universities { action } => {
            match action {
                UniversityAction::List {
                    country,
                    budget_min,
                    budget_max,
                    all,
                    sort,
                } => {
                    let filters = CatalogFilters {
                        country,
                        budget_min,
                        budget_max,
                        show_all: all,
                    };
                    let page = universities::browse(client, &filters, sort).await?;
                    Ok(universities::render_page(&page))
                }
                UniversityAction::Show { id } => {
                    let university = client.get_university(id).await?;
                    Ok(universities::render_detail(&university))
                }
                UniversityAction::Shortlist {
                    id,
                    category,
                    notes,
                } => Ok(universities::shortlist(client, id, category, notes)
                    .await?
                    .message
                    + "\n"),
                UniversityAction::Lock { id } => {
                    Ok(universities::lock(client, id).await?.message + "\n")
                }
                UniversityAction::Unlock { id } => {
                    Ok(universities::unlock(client, id).await?.message + "\n")
                }
                UniversityAction::Shortlisted => Ok(universities::render_shortlisted(
                    &client.list_shortlisted().await?,
                )),
                UniversityAction::Locked => {
                    Ok(universities::render_locked(&client.list_locked().await?))
                }
                UniversityAction::Compare { ids } => {
                    let selected = universities::compare(client, &ids).await?;
                    Ok(universities::render_comparison(&selected))
                }
            }
        }
        Command::Application => {
            let view = application::load(client).await?;
            Ok(application::render(&view))
        }
        Command::Todo { action } => match action {
            TodoAction::List => Ok(application::render_todos(&client.list_todos().await?)),
            TodoAction::Add {
                title,
                description,
                priority,
                university,
            } => {
                let todo = client
                    .create_todo(&TodoInput {
                        university_id: university,
                        title,
                        description,
                        priority,
                        due_date: None,
                    })
                    .await?;
                Ok(format!("Added to-do #{}.\n", todo.id))
            }
            TodoAction::Status { id, status } => {
                let todo = client
                    .update_todo(
                        id,
                        &TodoPatch {
                            status: Some(status),
                            ..Default::default()
                        },
                    )
                    .await?;
                Ok(format!("To-do #{} is now {}.\n", todo.id, todo.status))
            }
            TodoAction::Done { id } => {
                let patch = TodoPatch {
                    status: Some(TodoStatus::Completed),
                    ..Default::default()
                };
                let todo = client.update_todo(id, &patch).await?;
                Ok(format!("Completed \"{}\".\n", todo.title))
            }
            TodoAction::Delete { id } => Ok(client.delete_todo(id).await?.message + "\n"),
        },
        Command::Chat { message } => Ok(client.chat(&message.join(" ")).await? + "\n"),
        Command::Analysis => Ok(client.analysis().await? + "\n"),
    }
}
