//! Booking client entry point.
//!
//! Usage:
//! - `booking show` prints the current draft
//! - `booking start <camp-id>` starts or resumes a draft for a camp
//! - `booking submit` submits the draft
//! - `booking confirm <reservation-id>` checks the payment and clears the draft once paid

use std::process::ExitCode;

use booking::{BookingError, BookingFlow, Config, HttpBackend};
use common::{CampId, Money};
use reservation::{ReservationState, ReservationStore};
use session_store::{FileSessionStorage, JsonSlot};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

enum Command {
    Show,
    Start(CampId),
    Submit,
    Confirm(String),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Command> {
    let command = match args.next()?.as_str() {
        "show" => Command::Show,
        "start" => Command::Start(CampId::new(args.next()?.parse().ok()?)),
        "submit" => Command::Submit,
        "confirm" => Command::Confirm(args.next()?),
        _ => return None,
    };
    args.next().is_none().then_some(command)
}

/// Renders the draft, or a short notice when nothing has been selected yet.
fn render_draft(state: &ReservationState) -> Result<String, BookingError> {
    if state.is_pristine() {
        return Ok("no reservation in progress".to_string());
    }
    Ok(serde_json::to_string_pretty(state)?)
}

async fn run(config: Config, command: Command) -> Result<(), BookingError> {
    let storage = FileSessionStorage::for_session(&config.session_dir, &config.session_id)?;
    let store = ReservationStore::open(Money::zero(), JsonSlot::new(storage));
    let backend = HttpBackend::from_config(&config)?;
    let mut flow = BookingFlow::new(backend, store);

    match command {
        Command::Show => {}
        Command::Start(camp_id) => {
            flow.start(camp_id).await?;
        }
        Command::Submit => {
            let receipt = flow.submit().await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            return Ok(());
        }
        Command::Confirm(reservation_id) => {
            let status = flow.confirm_payment(&reservation_id).await?;
            println!("payment {status}");
        }
    }

    println!("{}", render_draft(flow.store().state())?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(command) = parse_args(std::env::args().skip(1)) else {
        eprintln!("usage: booking show | start <camp-id> | submit | confirm <reservation-id>");
        return ExitCode::from(2);
    };

    tracing::debug!(api_url = %config.api_url, session = %config.session_id, "booking client starting");

    match run(config, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "booking command failed");
            ExitCode::FAILURE
        }
    }
}
