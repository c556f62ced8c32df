use clap::Subcommand;
use repcycle_core::{Database, DriveOutcome, Event, PlaybackEngine, PlaybackError, TickDriver};
use tokio::sync::watch;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a session from a template (by id or name)
    Start { template: String },
    /// Print the current session state as JSON
    Status {
        /// Print every block instead of a summary
        #[arg(long)]
        full: bool,
    },
    /// Complete the active block, whatever it is
    Advance,
    /// Confirm the set at INDEX; ignored if it is no longer active
    Done { index: usize },
    /// End the active rest early
    Skip,
    /// Pause the rest countdown
    Pause,
    /// Resume the rest countdown
    Resume,
    /// Apply one second to the rest countdown
    Tick,
    /// Run the rest countdown in the foreground until input is needed
    Play,
    /// Discard the session without recording history
    Stop,
    /// Record completed blocks in history and end the session
    Finish,
}

/// Print events; rejected operations are warnings, not failures.
fn emit(result: Result<Vec<Event>, PlaybackError>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(events) => {
            for event in &events {
                print_json(event)?;
            }
            Ok(())
        }
        Err(e) if e.is_warning() => {
            eprintln!("warning: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn play(
    engine: &mut PlaybackEngine<&Database>,
    driver: TickDriver,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let interrupt = async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(true);
            }
            // the driver observes the signal and returns Cancelled
            std::future::pending::<()>().await
        };
        let drive = driver.run(engine, shutdown_rx, |event| {
            // one event per line while the countdown runs
            match serde_json::to_string(event) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!("could not encode event: {e}"),
            }
        });

        tokio::select! {
            outcome = drive => outcome,
            () = interrupt => Ok(DriveOutcome::Cancelled),
        }
    })?;

    print_json(&serde_json::json!({ "type": "PlayEnded", "outcome": outcome }))?;
    Ok(())
}

pub fn run(action: SessionAction, user: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(user)?;
    let mut engine = PlaybackEngine::new(&ctx.db, ctx.user.clone());

    let result = match action {
        SessionAction::Start { template } => {
            let template = ctx.db.find_template(&ctx.user, &template)?;
            let lookup = ctx.db.list_planned_sets(&ctx.user)?;
            engine.start(&template, &lookup)
        }
        SessionAction::Status { full } => {
            engine.refresh()?;
            match (full, engine.snapshot()) {
                (_, None) => println!("{{\"type\": \"NoSession\"}}"),
                (true, Some(session)) => print_json(session)?,
                (false, Some(_)) => {
                    if let Some(state) = engine.state() {
                        print_json(&state)?;
                    }
                }
            }
            return Ok(());
        }
        SessionAction::Advance => engine.advance(),
        SessionAction::Done { index } => engine.complete_block(index),
        SessionAction::Skip => engine.skip(),
        SessionAction::Pause => engine.pause(),
        SessionAction::Resume => engine.resume(),
        SessionAction::Tick => engine.tick(),
        SessionAction::Play => return play(&mut engine, TickDriver::from_config(&ctx.config.playback)),
        SessionAction::Stop => engine.stop(),
        SessionAction::Finish => engine.finish(),
    };

    emit(result)
}
