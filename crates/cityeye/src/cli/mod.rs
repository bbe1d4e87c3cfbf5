//! Command-line front end over a file-backed civic store.
//!
//! The `cityeye` binary only loads settings, parses arguments and prints.
//! Command dispatch lives here so it can be exercised in tests without
//! spawning a subprocess.
//!
//! Every command except `categorize` reads or writes the store, and a fresh
//! in-memory store would forget everything between invocations, so those
//! commands require `CITYEYE_DATA_DIR`. The signed-in user persists in the
//! store's current-user entry, which makes `sign-up`/`sign-in` followed by
//! `report` or `like` work across separate runs.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::StoreSettings;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};
use crate::domain::{
    Category, CivicStore, IdentityCode, Issue, IssueId, IssueStatus, IssueSubmission,
    StatusFilter, StoreError, User, UserDraft, UserId, UserRole, ValidationError, categorize,
};
use crate::outbound::FileKeyValueStore;

/// Parsed `cityeye` invocation.
#[derive(Debug, Parser)]
#[command(name = "cityeye", version, about = "Manage a CityEye civic store")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Role selectable at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Regular community member.
    Citizen,
    /// Member allowed to triage issues and ban users.
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Citizen => Self::Citizen,
            RoleArg::Admin => Self::Admin,
        }
    }
}

/// `cityeye` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print community statistics.
    Stats,
    /// Print the issue feed, newest first.
    Feed {
        /// `all` or one of `reported`, `under-review`, `in-progress`, `resolved`.
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Print the category the keyword rules assign to a report.
    Categorize {
        /// Report title.
        #[arg(long)]
        title: String,
        /// Report description.
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Register a user and sign them in.
    SignUp {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Twelve-digit identity code; spaces and dashes are ignored.
        #[arg(long)]
        identity_code: String,
        /// Role to register with.
        #[arg(long, value_enum, default_value = "citizen")]
        role: RoleArg,
        /// Optional contact email.
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign in as an existing user.
    SignIn {
        /// Identifier of the user.
        #[arg(long)]
        user: String,
    },
    /// Sign the current user out.
    SignOut,
    /// Report an issue as the signed-in user.
    Report {
        /// Short summary.
        #[arg(long)]
        title: String,
        /// Free-text details.
        #[arg(long)]
        description: String,
        /// Free-text location.
        #[arg(long)]
        location: String,
        /// Photo payload, typically a data URL.
        #[arg(long)]
        image: Option<String>,
    },
    /// Toggle the signed-in user's like on an issue.
    Like {
        /// Identifier of the issue.
        #[arg(long)]
        issue: String,
    },
    /// Move an issue to a new status. Requires a signed-in admin.
    SetStatus {
        /// Identifier of the issue.
        #[arg(long)]
        issue: String,
        /// One of `reported`, `under-review`, `in-progress`, `resolved`.
        #[arg(long)]
        status: IssueStatus,
    },
    /// Delete an issue. Requires a signed-in admin.
    Delete {
        /// Identifier of the issue.
        #[arg(long)]
        issue: String,
    },
    /// Ban a user. Requires a signed-in admin.
    Ban {
        /// Identifier of the user.
        #[arg(long)]
        user: String,
    },
}

impl Command {
    /// `false` only for commands that never touch the store.
    #[must_use]
    pub const fn needs_store(&self) -> bool {
        !matches!(self, Self::Categorize { .. })
    }
}

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings could not be loaded.
    #[error("failed to load configuration: {0}")]
    Config(String),
    /// A store-backed command ran without a data directory.
    #[error("CITYEYE_DATA_DIR must be set for this command")]
    MissingDataDir,
    /// The data directory is not valid UTF-8.
    #[error("data directory must be valid UTF-8: {0}")]
    NonUtf8DataDir(String),
    /// The command needs a signed-in user.
    #[error("no user is signed in; run sign-up or sign-in first")]
    SignedOut,
    /// The named user does not exist.
    #[error("unknown user '{0}'")]
    UnknownUser(String),
    /// Form input failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The storage adapter could not be opened.
    #[error(transparent)]
    Storage(#[from] KeyValueStoreError),
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedEntry<'a> {
    #[serde(flatten)]
    issue: &'a Issue,
    reporter_name: String,
}

#[derive(Serialize)]
struct Categorization {
    category: Category,
}

#[derive(Serialize)]
struct Done {
    ok: bool,
}

const DONE: Done = Done { ok: true };

/// Open the configured file store and run `command` against it.
///
/// `categorize` runs without a store.
///
/// # Errors
///
/// Returns [`CliError::MissingDataDir`] when a store-backed command runs
/// without a configured data directory, and otherwise whatever
/// [`execute`] reports.
pub fn run(settings: &StoreSettings, command: Command) -> Result<Value, CliError> {
    if !command.needs_store() {
        return execute(None::<&CivicStore<FileKeyValueStore>>, command);
    }

    let path = settings.data_dir().ok_or(CliError::MissingDataDir)?;
    let root = Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|raw| CliError::NonUtf8DataDir(raw.display().to_string()))?;
    let backend = Arc::new(FileKeyValueStore::open(&root)?);
    debug!(data_dir = %root, namespace = settings.namespace(), "using file store");
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = CivicStore::new(backend, clock).with_keys(settings.storage_keys());
    execute(Some(&store), command)
}

/// Run `command` against `store` and return its JSON output.
///
/// # Errors
///
/// Returns [`CliError::MissingDataDir`] when `store` is `None` for a
/// store-backed command, [`CliError::SignedOut`] when a command needs a
/// signed-in user, [`CliError::Invalid`] for rejected form input, and
/// [`CliError::Store`] when the store refuses or fails.
pub fn execute<S>(store: Option<&CivicStore<S>>, command: Command) -> Result<Value, CliError>
where
    S: KeyValueStore,
{
    match command {
        Command::Categorize { title, description } => categorization(&title, &description),
        other => execute_with_store(store.ok_or(CliError::MissingDataDir)?, other),
    }
}

fn execute_with_store<S>(store: &CivicStore<S>, command: Command) -> Result<Value, CliError>
where
    S: KeyValueStore,
{
    let value = match command {
        Command::Categorize { title, description } => categorization(&title, &description)?,
        Command::Stats => serde_json::to_value(store.community_stats())?,
        Command::Feed { status } => feed(store, status)?,
        Command::SignUp {
            name,
            identity_code,
            role,
            email,
        } => {
            let draft = UserDraft {
                name,
                email,
                identity_code: IdentityCode::from_input(&identity_code),
                role: role.into(),
            };
            draft.validate()?;
            serde_json::to_value(store.sign_up(draft)?)?
        }
        Command::SignIn { user } => {
            let found = store
                .find_user(&UserId::new(user.as_str()))
                .ok_or(CliError::UnknownUser(user))?;
            store.set_current_user(found.id())?;
            serde_json::to_value(found)?
        }
        Command::SignOut => {
            store.clear_current_user()?;
            serde_json::to_value(DONE)?
        }
        Command::Report {
            title,
            description,
            location,
            image,
        } => {
            let reporter = signed_in(store)?;
            let mut submission = IssueSubmission::new(title, description, location);
            submission.image = image;
            submission.validate()?;
            serde_json::to_value(store.report_issue(&reporter, submission)?)?
        }
        Command::Like { issue } => {
            let user = signed_in(store)?;
            store.toggle_like(&IssueId::new(issue), user.id())?;
            serde_json::to_value(DONE)?
        }
        Command::SetStatus { issue, status } => {
            let actor = store.current_user();
            let console = store.admin_console(actor.as_ref())?;
            console.change_status(&IssueId::new(issue), status)?;
            serde_json::to_value(DONE)?
        }
        Command::Delete { issue } => {
            let actor = store.current_user();
            let console = store.admin_console(actor.as_ref())?;
            console.delete_issue(&IssueId::new(issue))?;
            serde_json::to_value(DONE)?
        }
        Command::Ban { user } => {
            let actor = store.current_user();
            let console = store.admin_console(actor.as_ref())?;
            console.ban_user(&UserId::new(user))?;
            serde_json::to_value(DONE)?
        }
    };
    Ok(value)
}

fn categorization(title: &str, description: &str) -> Result<Value, CliError> {
    let category = categorize(title, description);
    Ok(serde_json::to_value(Categorization { category })?)
}

fn signed_in<S>(store: &CivicStore<S>) -> Result<User, CliError>
where
    S: KeyValueStore,
{
    store.current_user().ok_or(CliError::SignedOut)
}

fn feed<S>(store: &CivicStore<S>, status: StatusFilter) -> Result<Value, CliError>
where
    S: KeyValueStore,
{
    let issues = store.issue_feed(status);
    let entries: Vec<FeedEntry<'_>> = issues
        .iter()
        .map(|issue| FeedEntry {
            issue,
            reporter_name: store.reporter_name(issue),
        })
        .collect();
    Ok(serde_json::to_value(entries)?)
}
