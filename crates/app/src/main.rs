use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::info;

use quiz_core::auth::{Access, Role, Route, authorize, landing_route};
use quiz_core::model::{
    ContentUpload, GenerationOverrides, GenerationParams, JobId, NewUser, QuestionType,
    UploadFile, UserId, UserUpdate,
};
use services::{
    ApiClient, ApiConfig, AuthService, Clock, ContentService, QuizSessionService,
    UserAdminService,
};
use storage::LocalState;

mod db;
mod runner;

const DEFAULT_LOG_FILTER: &str = "quiz=info,services=info,storage=info";

#[derive(Parser, Debug)]
#[command(name = "quiz", version, about = "Terminal client for the quiz platform")]
struct Args {
    /// Quiz platform API base URL.
    #[arg(long, env = "QUIZ_API_BASE", default_value = ApiConfig::DEFAULT_BASE_URL, global = true)]
    api_base: String,

    /// Request timeout in seconds.
    #[arg(long, env = "QUIZ_API_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Local state database (`sqlite::memory:` allowed).
    #[arg(long, env = "QUIZ_DB_URL", default_value = "sqlite://quiz-client.sqlite3", global = true)]
    db: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "QUIZ_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// Email a sign-up verification code.
    SendCode {
        #[arg(long)]
        email: String,
    },
    /// Create an account, optionally verifying an emailed code first.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "QUIZ_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        code: Option<String>,
    },
    /// Generate a new quiz for a job.
    Generate {
        /// Job to generate for; defaults to the stored job, then a random one.
        #[arg(long)]
        job_id: Option<JobId>,
        #[command(flatten)]
        options: GenerateOptions,
        /// Start the quiz right away.
        #[arg(long)]
        take: bool,
    },
    /// Take the stored quiz interactively.
    Take,
    /// Replace the stored quiz with a new one for the same job.
    Regenerate {
        #[command(flatten)]
        options: GenerateOptions,
    },
    /// Pick a random uploaded job and remember it.
    RandomJob,
    /// Manage users (admin only).
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
    /// Manage uploaded course content (admin or tutor).
    Content {
        #[command(subcommand)]
        command: ContentCommand,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct GenerateOptions {
    #[arg(long)]
    num_questions: Option<u32>,
    /// Question types, e.g. `mcq_single,true_false`.
    #[arg(long, value_delimiter = ',')]
    types: Option<Vec<QuestionType>>,
    #[arg(long)]
    topic_hint: Option<String>,
    #[arg(long)]
    student_id: Option<String>,
}

impl From<GenerateOptions> for GenerationOverrides {
    fn from(options: GenerateOptions) -> Self {
        Self {
            num_questions: options.num_questions,
            types: options.types,
            topic_hint: options.topic_hint,
            student_id: options.student_id,
        }
    }
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    List,
    Update {
        id: UserId,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    Delete {
        id: UserId,
    },
    /// Show the topics a user selected.
    Topics {
        id: UserId,
    },
}

#[derive(Subcommand, Debug)]
enum ContentCommand {
    List,
    Upload {
        #[arg(long)]
        course_code: String,
        #[arg(long)]
        week: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    Delete {
        job_id: JobId,
    },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "admin" | "tutor" | "user" => Ok(Role::parse_lenient(raw)),
        _ => Err(format!("unknown role `{raw}` (expected admin, tutor, or user)")),
    }
}

struct App {
    clock: Clock,
    state: LocalState,
    api: ApiClient,
}

impl App {
    fn sessions(&self) -> QuizSessionService {
        QuizSessionService::new(self.clock, self.state.clone(), Arc::new(self.api.clone()))
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.state.clone())
    }

    async fn require(&self, route: Route) -> Result<()> {
        let ctx = self.state.auth_context().await?;
        match authorize(route, &ctx) {
            Access::Allow => Ok(()),
            Access::Redirect(to) => {
                bail!("not allowed to open {}; log in first ({})", route.path(), to.path())
            }
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let db_url = db::normalize_sqlite_url(&args.db);
    db::prepare_sqlite_file(&db_url)?;
    let state = LocalState::sqlite(&db_url)
        .await
        .wrap_err_with(|| format!("failed to open local state at {db_url}"))?;
    let config = ApiConfig::new(&args.api_base, Duration::from_secs(args.timeout_secs))?;
    let app = App {
        clock: Clock::system(),
        state,
        api: ApiClient::new(config)?,
    };

    run(&app, args.command).await
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let outcome = app.auth().login(&email, &password).await?;
            match &outcome.user {
                Some(user) => println!("Logged in as {} ({})", user.full_name(), outcome.role),
                None => println!("Logged in ({})", outcome.role),
            }
            println!("Landing page: {}", outcome.landing.path());
        }
        Command::Logout => {
            app.auth().logout().await?;
            println!("Logged out.");
        }
        Command::Whoami => {
            let auth = app.auth();
            let ctx = auth.context().await?;
            match (ctx.role(), auth.current_user().await?) {
                (Some(role), Some(user)) => {
                    println!("{} <{}> ({role})", user.full_name(), user.email);
                    println!("Landing page: {}", landing_route(role).path());
                }
                (Some(role), None) => println!("Logged in ({role})"),
                (None, _) => println!("Not logged in."),
            }
        }
        Command::SendCode { email } => {
            app.auth().send_register_code(&email).await?;
            println!("Verification code sent to {email}.");
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            code,
        } => {
            let auth = app.auth();
            if let Some(code) = code {
                auth.verify_register_code(&email, &code).await?;
            }
            let user = auth
                .register(NewUser {
                    first_name,
                    last_name,
                    email,
                    password,
                })
                .await?;
            println!("Registered {} <{}>. You can log in now.", user.full_name(), user.email);
        }
        Command::Generate {
            job_id,
            options,
            take,
        } => {
            let job_id = match job_id {
                Some(job_id) => job_id,
                None => match app.state.job_id().await? {
                    Some(job_id) => job_id,
                    None => app.api.random_job_id().await?,
                },
            };
            let params = GenerationParams::new(job_id).apply(options.into());
            let sessions = app.sessions();
            let mut session = sessions.generate(params).await?;
            println!(
                "Generated \"{}\" with {} questions.",
                session.title(),
                session.quiz().len()
            );
            if take {
                runner::run(&mut session, &sessions).await?;
            }
        }
        Command::Take => {
            app.require(Route::Quiz).await?;
            let sessions = app.sessions();
            let mut session = sessions.resume().await?;
            runner::run(&mut session, &sessions).await?;
        }
        Command::Regenerate { options } => {
            let sessions = app.sessions();
            let mut session = sessions.resume().await?;
            sessions.regenerate(&mut session, options.into()).await?;
            println!(
                "Generated \"{}\" with {} questions.",
                session.title(),
                session.quiz().len()
            );
        }
        Command::RandomJob => {
            let job_id = app.api.random_job_id().await?;
            app.state.set_job_id(&job_id).await?;
            info!(%job_id, "picked random job");
            println!("{job_id}");
        }
        Command::Users { command } => {
            app.require(Route::AdminUsers).await?;
            users(UserAdminService::new(app.api.clone(), app.state.clone()), command).await?;
        }
        Command::Content { command } => {
            app.require(Route::AdminUploadContent).await?;
            content(ContentService::new(app.api.clone(), app.state.clone()), command).await?;
        }
    }
    Ok(())
}

async fn users(service: UserAdminService, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List => {
            for user in service.list_users().await? {
                let status = if user.is_active { "active" } else { "inactive" };
                println!(
                    "{:>5}  {:<28} {:<32} {:<6} {status}",
                    user.id.value(),
                    user.full_name(),
                    user.email,
                    user.role.as_str()
                );
            }
        }
        UsersCommand::Update {
            id,
            first_name,
            last_name,
            role,
        } => {
            let user = service
                .update_user(
                    id,
                    UserUpdate {
                        first_name,
                        last_name,
                        role,
                    },
                )
                .await?;
            println!("Updated {} ({})", user.full_name(), user.role);
        }
        UsersCommand::Delete { id } => {
            service.delete_user(id).await?;
            println!("Deleted user {id}");
        }
        UsersCommand::Topics { id } => {
            let topics = service.selected_topics(id).await?;
            println!("{topics:#}");
        }
    }
    Ok(())
}

async fn content(service: ContentService, command: ContentCommand) -> Result<()> {
    match command {
        ContentCommand::List => {
            for upload in service.list_uploads().await? {
                println!(
                    "{}  {} week {}  by {}",
                    upload.job_id, upload.course_code, upload.week, upload.uploaded_by
                );
                for file in &upload.files {
                    println!("    {}  {}", file.name, file.url);
                }
            }
        }
        ContentCommand::Upload {
            course_code,
            week,
            files,
        } => {
            let mut parts = Vec::with_capacity(files.len());
            for path in &files {
                parts.push(read_upload_file(path).await?);
            }
            let created = service
                .upload(ContentUpload {
                    course_code,
                    week,
                    files: parts,
                })
                .await?;
            println!("Uploaded {} files as job {}", created.files.len(), created.job_id);
        }
        ContentCommand::Delete { job_id } => {
            service.delete_upload(&job_id).await?;
            println!("Deleted upload {job_id}");
        }
    }
    Ok(())
}

async fn read_upload_file(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadFile {
        mime: mime_for(path).map(str::to_string),
        name,
        bytes,
    })
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" | "md" => Some("text/plain"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "pptx" => {
            Some("application/vnd.openxmlformats-officedocument.presentationml.presentation")
        }
        _ => None,
    }
}
