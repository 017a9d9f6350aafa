use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use learnhub_config::{
    Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions, StoreBackend,
};
use learnhub_core::api_types::{ApiResult, Envelope};
use learnhub_core::database::{MemoryStore, PostgresStore, RestStore};
use learnhub_core::domain::AuthCrypto;
use learnhub_core::identity::{
    DEFAULT_PASSWORD_LEN, generate_password, generate_student_id,
};
use learnhub_core::local::{FileLocalStore, LocalStore, ThemeManager};
use learnhub_core::model::{NewCourse, NewUser, UserRole};
use learnhub_core::query::SearchFilters;
use learnhub_core::{AppUnitOfWork, LearnHubApi};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{
    Cli, Command, CourseCommand, CreateUserArgs, DbCommand, ProgressCommand,
    ThemeCommand, UserCommand, WishlistCommand,
};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ConfigLoad { config, warnings } = ConfigLoader::with_options(
        ConfigLoaderOptions {
            config_path: cli.config.clone(),
            env_file: cli.env_file.clone(),
        },
    )
    .load()
    .context("failed to load configuration")?;

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    warnings.log();

    match cli.command {
        Command::Db(DbCommand::Migrate) => run_db_migrate(&config).await,
        Command::Theme(command) => run_theme(&config, command),
        command => {
            let api = build_api(&config).await?;
            run_api_command(&api, command).await
        }
    }
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<ExitCode> {
    let store = connect_postgres(config).await?;
    store.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(ExitCode::SUCCESS)
}

fn run_theme(config: &Config, command: ThemeCommand) -> anyhow::Result<ExitCode> {
    let store: Arc<dyn LocalStore> = Arc::new(
        FileLocalStore::open(config.local_state.path.clone()).with_context(|| {
            format!(
                "failed to open local state at {}",
                config.local_state.path.display()
            )
        })?,
    );
    let themes = ThemeManager::new(store);

    let message = match command {
        ThemeCommand::Show => themes.current().to_string(),
        ThemeCommand::Toggle => themes.toggle().context("failed to save theme")?,
    };
    println!("{message}");
    Ok(ExitCode::SUCCESS)
}

async fn connect_postgres(config: &Config) -> anyhow::Result<PostgresStore> {
    let Some(url) = config.database.url.as_deref() else {
        bail!("DATABASE_URL is required for this command");
    };
    PostgresStore::connect(url, config.database.pool_settings())
        .await
        .context("failed to connect to PostgreSQL")
}

async fn build_api(config: &Config) -> anyhow::Result<LearnHubApi> {
    let uow = match config.store {
        StoreBackend::Memory => {
            warn!("using the in-memory store; nothing outlives this process");
            AppUnitOfWork::memory(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            AppUnitOfWork::from_postgres(connect_postgres(config).await?)
        }
        StoreBackend::Rest => {
            let Some(rest) = config.rest.as_ref() else {
                bail!("LEARNHUB_REST_URL is required for the rest store");
            };
            let store = RestStore::new(rest.store_config())
                .context("failed to build REST client")?;
            AppUnitOfWork::from_rest(store)
        }
    };

    let crypto = AuthCrypto::new(config.auth.password_pepper.as_bytes())
        .context("failed to initialize password hashing")?;
    info!(store = %config.store, "services ready");
    Ok(LearnHubApi::with_settings(uow, Arc::new(crypto), config.api_settings()))
}

async fn run_api_command(
    api: &LearnHubApi,
    command: Command,
) -> anyhow::Result<ExitCode> {
    let code = match command {
        Command::User(UserCommand::Create(args)) => create_user(api, args).await,
        Command::User(UserCommand::Login(args)) => emit(
            &api.login(&args.login_id, &args.password, args.role).await,
        ),
        Command::User(UserCommand::SetPassword { user, password }) => {
            emit(&api.set_password(user, &password).await)
        }
        Command::Course(CourseCommand::Create {
            title,
            description,
            category,
            hidden,
        }) => emit(
            &api.create_course(NewCourse {
                title,
                description,
                category,
                is_visible: !hidden,
            })
            .await,
        ),
        Command::Progress(ProgressCommand::Get(args)) => {
            emit(&api.get_progress(args.user, args.course).await)
        }
        Command::Progress(ProgressCommand::Set {
            enrollment,
            progress,
            lesson,
        }) => emit(
            &api.update_progress(
                enrollment.user,
                enrollment.course,
                progress,
                lesson.as_deref(),
            )
            .await,
        ),
        Command::Wishlist(WishlistCommand::Add(args)) => {
            emit(&api.wishlist_add(args.user, args.course).await)
        }
        Command::Wishlist(WishlistCommand::Remove(args)) => {
            emit(&api.wishlist_remove(args.user, args.course).await)
        }
        Command::Wishlist(WishlistCommand::List(args)) => {
            emit(&api.wishlist_get(args.user).await)
        }
        Command::Enrolled(args) => emit(&api.get_enrolled(args.user).await),
        Command::Analytics(args) => emit(&api.student_analytics(args.user).await),
        Command::Search(args) => {
            let filters = SearchFilters {
                category: args.category,
            };
            emit(
                &api.search_courses(&args.text, &filters, args.page, args.page_size)
                    .await,
            )
        }
        Command::Db(_) | Command::Theme(_) => {
            bail!("command does not use the service layer")
        }
    };
    Ok(code)
}

async fn create_user(api: &LearnHubApi, args: CreateUserArgs) -> ExitCode {
    let login_id = args.login_id.unwrap_or_else(|| match args.role {
        UserRole::Student => generate_student_id(),
        _ => String::new(),
    });
    let generated = args.password.is_none();
    let password = args
        .password
        .unwrap_or_else(|| generate_password(DEFAULT_PASSWORD_LEN));

    let result = api
        .register(
            NewUser {
                login_id,
                role: args.role,
                full_name: args.full_name,
                email: args.email,
            },
            &password,
        )
        .await;

    if generated && result.is_ok() {
        eprintln!("generated password: {password}");
    }
    emit(&result)
}

/// Prints the envelope and maps failures to a non-zero exit.
fn emit<T: Serialize>(result: &ApiResult<T>) -> ExitCode {
    println!("{}", Envelope(result).to_value());
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
