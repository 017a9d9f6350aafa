use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use learnhub_core::model::{CourseId, UserKey, UserRole};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "learnhubctl", version)]
#[command(about = "Operate LearnHub enrollments, wishlists and accounts")]
pub struct Cli {
    /// Path to learnhub.toml (defaults to ./learnhub.toml when present)
    #[arg(long, global = true, env = "LEARNHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to a .env file seeding the environment
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(subcommand)]
    Db(DbCommand),
    #[command(subcommand)]
    User(UserCommand),
    #[command(subcommand)]
    Course(CourseCommand),
    #[command(subcommand)]
    Progress(ProgressCommand),
    #[command(subcommand)]
    Wishlist(WishlistCommand),
    /// List a student's enrolled courses with their progress
    Enrolled(UserArg),
    /// Summarize a student's enrollments
    Analytics(UserArg),
    /// Search visible courses
    Search(SearchArgs),
    #[command(subcommand)]
    Theme(ThemeCommand),
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register an account; ids and passwords are generated when omitted
    Create(CreateUserArgs),
    /// Check credentials and refresh the login streak
    Login(LoginArgs),
    /// Replace an account's password
    SetPassword {
        #[arg(long)]
        user: UserKey,
        #[arg(long, env = "LEARNHUB_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Args)]
pub struct CreateUserArgs {
    /// Login id; students get a STU-<year>-<n> id when omitted
    #[arg(long)]
    pub login_id: Option<String>,
    #[arg(long, default_value_t = UserRole::Student)]
    pub role: UserRole,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Generated and printed when omitted
    #[arg(long, env = "LEARNHUB_NEW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub login_id: String,
    #[arg(long, env = "LEARNHUB_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Restrict the login to one role
    #[arg(long)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// Create a course after validating the draft
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// Keep the course out of search results
        #[arg(long)]
        hidden: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProgressCommand {
    /// Read one enrollment's progress
    Get(EnrollmentArgs),
    /// Record progress, optionally marking a lesson complete
    Set {
        #[command(flatten)]
        enrollment: EnrollmentArgs,
        /// Percentage; values outside 0-100 are clamped
        #[arg(long, allow_negative_numbers = true)]
        progress: i64,
        #[arg(long)]
        lesson: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    Add(EnrollmentArgs),
    Remove(EnrollmentArgs),
    List(UserArg),
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the stored theme
    Show,
    /// Switch between light and dark
    Toggle,
}

#[derive(Debug, Args)]
pub struct UserArg {
    #[arg(long)]
    pub user: UserKey,
}

#[derive(Debug, Args)]
pub struct EnrollmentArgs {
    #[arg(long)]
    pub user: UserKey,
    #[arg(long)]
    pub course: CourseId,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free text matched against title and description
    #[arg(default_value = "")]
    pub text: String,
    /// Category filter; `all` disables it
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
}
