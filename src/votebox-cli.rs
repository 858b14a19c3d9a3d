//! A terminal client for the voting API: the admin dashboard, candidate
//! management, the voter ballot form and the public results screen.

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, info, warn, LevelFilter};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{runtime::ConfigErrors, Appender, Root},
    encode::pattern::PatternEncoder,
};
use thiserror::Error;

use votebox_backend::{
    client::{ApiClient, ClientError, GENERIC_ERROR_MESSAGE},
    model::{
        api::candidate::CandidateSpec,
        common::{Candidate, VoterDetails, VoterRecord},
    },
    scheduled_task::{PeriodicTask, REFRESH_INTERVAL},
    view::{
        candidates::{CandidateForm, CandidateList},
        dashboard::AdminDashboard,
        login::AdminLogin,
        results::ResultsView,
        voter::{Screen, VoterFlow},
    },
};

const PROGRAM_NAME: &str = "votebox";

const ABOUT_TEXT: &str = "Run and take part in a single election through the voting API.

EXIT CODES:
     0: Success.
     1: The request was refused or could not be made.";

#[derive(Parser)]
#[command(name = PROGRAM_NAME, version, about = ABOUT_TEXT)]
struct Cli {
    /// Base URL of the voting API.
    #[arg(long, env = "VOTEBOX_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Admin password, needed for commands that change the election.
    #[arg(long, env = "VOTEBOX_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log more; repeat for HTTP-level detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the voting session, or change it.
    Session {
        #[command(subcommand)]
        action: Option<SessionAction>,
    },
    /// List candidates, or add and remove them.
    Candidates {
        #[command(subcommand)]
        action: Option<CandidateAction>,
    },
    /// Show the ranked results.
    Results {
        /// Keep refreshing until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Show the admin overview: status, turnout and results.
    Dashboard {
        /// Keep refreshing until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Cast a vote.
    Vote {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        location: String,
        #[arg(long)]
        index_number: String,
        /// Candidate name or id.
        #[arg(long)]
        candidate: String,
    },
    /// Look up a voter by index number.
    Voter { index_number: String },
    /// End the admin session everywhere.
    Logout,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Open voting.
    Start,
    /// Close voting.
    Stop,
    /// Show results to voters.
    Display,
    /// Hide results from voters.
    Hide,
}

#[derive(Subcommand)]
enum CandidateAction {
    /// Add a candidate.
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove a candidate by id.
    Remove { id: String },
}

/// Errors that this program may produce.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Refused with a message meant for the user.
    #[error("{0}")]
    Refused(String),
    #[error("An admin password is required; pass --password or set VOTEBOX_ADMIN_PASSWORD")]
    PasswordRequired,
    #[error("Failed to configure logging: {0}")]
    LogConfig(#[from] ConfigErrors),
    #[error("Failed to configure logging: {0}")]
    LogInit(#[from] log::SetLoggerError),
}

impl Error {
    /// What to tell the user.
    fn message(&self) -> String {
        match self {
            Self::Client(e) => e.message(),
            other => other.to_string(),
        }
    }
}

/// Log to stderr, so stdout only carries command output.
fn init_logging(verbose: u8) -> Result<(), Error> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l:<5})} {m}{n}")))
        .build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Log in with the configured password, or fail with the login form's error.
async fn login(client: &ApiClient, password: Option<&str>) -> Result<(), Error> {
    let password = password.ok_or(Error::PasswordRequired)?;
    let mut form = AdminLogin::new(false);
    form.set_password(password);
    if form.submit_remote(client).await {
        info!("Logged in as admin");
        Ok(())
    } else {
        let message = form.error().unwrap_or(GENERIC_ERROR_MESSAGE);
        Err(Error::Refused(message.to_string()))
    }
}

/// Find a candidate by id, or failing that by case-insensitive name.
fn find_candidate<'a>(candidates: &'a [Candidate], key: &str) -> Option<&'a Candidate> {
    candidates
        .iter()
        .find(|c| c.id.to_string() == key)
        .or_else(|| {
            candidates
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(key.trim()))
        })
}

async fn fetch_results_view(client: &ApiClient) -> Result<ResultsView, ClientError> {
    Ok(ResultsView {
        session: client.session().await?,
        stats: client.stats().await?,
        results: client.results().await?,
    })
}

async fn fetch_dashboard(client: &ApiClient) -> Result<AdminDashboard, ClientError> {
    Ok(AdminDashboard {
        session: client.session().await?,
        stats: client.stats().await?,
        candidate_count: client.candidates().await?.len(),
        results: client.results().await?,
    })
}

/// Render a screen once, or on every refresh until interrupted.
async fn show<F, Fut>(client: &ApiClient, watch: bool, render: F) -> Result<(), Error>
where
    F: Fn(ApiClient) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<String, ClientError>> + Send + 'static,
{
    if !watch {
        print!("{}", render(client.clone()).await?);
        return Ok(());
    }

    let task_client = client.clone();
    let task = PeriodicTask::spawn(REFRESH_INTERVAL, move || {
        let screen = render(task_client.clone());
        async move {
            match screen.await {
                // Clear the terminal before redrawing.
                Ok(screen) => print!("\x1B[2J\x1B[H{screen}"),
                Err(e) => {
                    warn!("Refresh failed: {e}");
                    eprintln!("{}", e.message());
                }
            }
        }
    });

    if let Err(e) = rocket::tokio::signal::ctrl_c().await {
        warn!("Failed to wait for interrupt: {e}");
    }
    task.cancel();
    Ok(())
}

async fn vote(client: &ApiClient, voter_details: VoterDetails, key: &str) -> Result<(), Error> {
    let session = client.session().await?;
    let mut flow = VoterFlow::new();
    if flow.screen(&session) == Screen::Results {
        println!("Voting has closed and results have been published.\n");
        print!("{}", fetch_results_view(client).await?);
        return Ok(());
    }

    // Step 1: details.
    let existing = existing_voter(client, &voter_details).await?;
    if !flow.submit_details(voter_details, &session, existing.as_ref()) {
        return Err(flow_error(&flow));
    }

    // Step 2: candidate.
    let candidates = client.candidates().await?;
    if let Some(candidate) = find_candidate(&candidates, key) {
        flow.select_candidate(candidate.id);
    }
    if !flow.submit_candidate() {
        return Err(flow_error(&flow));
    }

    // Step 3: confirm.
    print!("{}", flow.summary(&candidates));
    let ballot = flow.ballot().ok_or_else(|| flow_error(&flow))?;
    let accepted = match client.cast_vote(&ballot).await {
        Ok(vote) => {
            debug!("Recorded vote {}", vote.id);
            true
        }
        Err(e) => {
            warn!("Vote was not recorded: {e}");
            false
        }
    };
    flow.record_cast(accepted);
    if !accepted {
        return Err(flow_error(&flow));
    }

    println!("\nVote submitted successfully! Thank you for participating.");
    Ok(())
}

/// Look the voter up, but only once their details are valid; a lookup can
/// register a placeholder voter on the server.
async fn existing_voter(
    client: &ApiClient,
    voter_details: &VoterDetails,
) -> Result<Option<VoterRecord>, ClientError> {
    if voter_details.validate().is_err() {
        return Ok(None);
    }
    client.voter(&voter_details.index_number).await
}

fn flow_error(flow: &VoterFlow) -> Error {
    Error::Refused(flow.error().unwrap_or(GENERIC_ERROR_MESSAGE).to_string())
}

async fn run(cli: Cli) -> Result<(), Error> {
    let client = ApiClient::new(&cli.api_url)?;
    debug!("Using voting API at {}", client.base_url());
    let password = cli.password.as_deref();

    match cli.command {
        Command::Session { action: None } => {
            let session = client.session().await?;
            println!("{}", session.status_label());
            if let Some(start) = session.start_time {
                println!("Started: {}", start.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if let Some(end) = session.end_time {
                println!("Ended:   {}", end.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!(
                "Results {}",
                if session.display_results {
                    "are visible to voters"
                } else {
                    "are hidden"
                }
            );
        }
        Command::Session {
            action: Some(action),
        } => {
            login(&client, password).await?;
            let session = match action {
                SessionAction::Start => client.start_voting().await?,
                SessionAction::Stop => client.stop_voting().await?,
                SessionAction::Display => client.show_results().await?,
                SessionAction::Hide => client.hide_results().await?,
            };
            println!("{}", session.status_label());
        }
        Command::Candidates { action: None } => {
            print!("{}", CandidateList(&client.candidates().await?));
        }
        Command::Candidates {
            action:
                Some(CandidateAction::Add {
                    name,
                    description,
                    image_url,
                }),
        } => {
            let mut form = CandidateForm::new(
                name,
                description.unwrap_or_default(),
                image_url.unwrap_or_default(),
            );
            let spec: CandidateSpec = form
                .submit()
                .ok_or_else(|| Error::Refused(form.error().unwrap_or_default()))?;
            login(&client, password).await?;
            let candidate = client.add_candidate(&spec).await?;
            println!("Added {} ({})", candidate.name, candidate.id);
        }
        Command::Candidates {
            action: Some(CandidateAction::Remove { id }),
        } => {
            let candidates = client.candidates().await?;
            let candidate = find_candidate(&candidates, &id)
                .ok_or_else(|| Error::Refused(format!("No candidate matches \"{id}\"")))?;
            login(&client, password).await?;
            client.remove_candidate(candidate.id).await?;
            println!("Removed {}", candidate.name);
        }
        Command::Results { watch } => {
            show(&client, watch, |client| async move {
                Ok::<_, ClientError>(fetch_results_view(&client).await?.to_string())
            })
            .await?;
        }
        Command::Dashboard { watch } => {
            show(&client, watch, |client| async move {
                Ok::<_, ClientError>(fetch_dashboard(&client).await?.to_string())
            })
            .await?;
        }
        Command::Vote {
            full_name,
            age,
            location,
            index_number,
            candidate,
        } => {
            let voter_details = VoterDetails {
                full_name,
                age,
                location,
                index_number,
            };
            vote(&client, voter_details, &candidate).await?;
        }
        Command::Voter { index_number } => match client.voter(&index_number).await? {
            Some(record) => {
                let details = &record.voter_details;
                println!("{} ({})", details.full_name, details.index_number);
                println!("Age {}, {}", details.age, details.location);
                println!(
                    "{}",
                    if record.has_voted {
                        "Has voted"
                    } else {
                        "Has not voted"
                    }
                );
            }
            None => return Err(Error::Refused(format!("Voter {index_number} not found"))),
        },
        Command::Logout => {
            login(&client, password).await?;
            client.logout().await?;
            println!("Logged out");
        }
    }
    Ok(())
}

#[rocket::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("{}", e.message());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use votebox_backend::model::mongodb::Id;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_vote() {
        let cli = Cli::try_parse_from([
            PROGRAM_NAME,
            "--api-url",
            "http://voting.local",
            "vote",
            "--full-name",
            "Ada Lovelace",
            "--age",
            "36",
            "--location",
            "London",
            "--index-number",
            "v1",
            "--candidate",
            "Alice",
        ])
        .unwrap();

        assert_eq!("http://voting.local", cli.api_url);
        assert!(matches!(cli.command, Command::Vote { age: 36, .. }));
    }

    #[test]
    fn parse_session_show() {
        let cli = Cli::try_parse_from([PROGRAM_NAME, "session"]).unwrap();
        assert!(matches!(cli.command, Command::Session { action: None }));
    }

    #[rocket::async_test]
    async fn invalid_details_skip_voter_lookup() {
        // Nothing listens on port 9 locally, so any lookup fails.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let underage = VoterDetails {
            full_name: "Ada Lovelace".to_string(),
            age: 17,
            location: "London".to_string(),
            index_number: "v1".to_string(),
        };

        assert_eq!(None, existing_voter(&client, &underage).await.unwrap());

        let adult = VoterDetails { age: 36, ..underage };
        assert!(matches!(
            existing_voter(&client, &adult).await,
            Err(ClientError::Transport(_))
        ));
    }

    #[test]
    fn candidate_lookup() {
        let alice = Candidate {
            id: Id::new(),
            name: "Alice".to_string(),
            description: None,
            image_url: None,
        };
        let bob = Candidate {
            id: Id::new(),
            name: "Bob".to_string(),
            description: None,
            image_url: None,
        };
        let candidates = [alice.clone(), bob.clone()];

        assert_eq!(Some(&bob), find_candidate(&candidates, &bob.id.to_string()));
        assert_eq!(Some(&alice), find_candidate(&candidates, " alice"));
        assert_eq!(None, find_candidate(&candidates, "Carol"));
    }
}
