//!
//! scihealth CLI
//! -------------
//! Command-line front end for the conference portal. Keeps its session in a
//! JSON file between invocations and prints view models as JSON.

use std::env;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use scihealth::api::ApiClient;
use scihealth::config::ClientConfig;
use scihealth::identity::SessionStore;
use scihealth::portal::Portal;
use scihealth::ClientError;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} login <email> <password>   authenticate and store the session\n  {program} overview                   proposal counters and recent submissions\n  {program} evaluations                proposals with their reviews and scores\n  {program} profile                    current user's profile\n  {program} status                     show whether a session is stored\n  {program} logout                     forget the stored session\n\nEnvironment:\n  SCIHEALTH_API_URL            API base URL\n  SCIHEALTH_SESSION_FILE       session file (default .scihealth_session.json)\n  SCIHEALTH_HTTP_TIMEOUT_SECS  request timeout in seconds\n  RUST_LOG                     log filter (default info)"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Fatal errors are shown with their user-facing text; "not logged in" is not a crash.
fn report(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::SessionAbsent => anyhow!("{} (run `login` first)", err.user_message()),
        other => anyhow!("{} [{}]", other.user_message(), other.code_str()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "scihealth".to_string());
    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage(&program);
        return Ok(());
    };

    let config = ClientConfig::from_env();
    info!(
        target: "scihealth",
        "scihealth starting: api='{}', session_file='{}', timeout={:?}",
        config.api_url,
        config.session_file.display(),
        config.http_timeout
    );
    let session = SessionStore::with_file(&config.session_file);
    session.init().map_err(report)?;
    let portal = Portal::new(ApiClient::new(&config).map_err(report)?, session);

    match command {
        "login" => {
            let (Some(email), Some(password)) = (args.get(2), args.get(3)) else {
                print_usage(&program);
                return Err(anyhow!("login needs <email> <password>"));
            };
            let outcome = portal.login(email, password).await.map_err(report)?;
            eprintln!("{}", outcome.greeting());
            print_json(&outcome)?;
        }
        "overview" => print_json(&portal.author_overview().await.map_err(report)?)?,
        "evaluations" => print_json(&portal.evaluations().await.map_err(report)?)?,
        "profile" => print_json(&portal.participant_profile().await.map_err(report)?)?,
        "status" => match portal.session().read() {
            Some(state) => println!("logged in as role '{}'", state.role),
            None => println!("not logged in"),
        },
        "logout" => {
            let next = portal.logout().map_err(report)?;
            println!("{}", next);
        }
        "-h" | "--help" | "help" => print_usage(&program),
        other => {
            print_usage(&program);
            return Err(anyhow!("unknown command '{}'", other));
        }
    }
    Ok(())
}
