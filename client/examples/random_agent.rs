//! Random Agent Example
//!
//! Logs in, searches for random battles and picks a random legal action at
//! every decision point.
//!
//! Usage:
//!   cargo run --example random_agent [credentials-file] [battles]
//!
//! Without a credentials file the agent plays as a random guest.
//! Set RUST_LOG=vantage_battle=debug to watch the interpreter work.

use anyhow::Result;
use rand::seq::SliceRandom;
use tracing_subscriber::EnvFilter;
use vantage_client::{
    BattleSession, ClientConfig, Credentials, DecisionKind, LegalActions, Phase, Signal,
};

#[derive(Clone, Copy)]
enum Action {
    Move(usize),
    Switch(usize),
}

fn pick_action(legal: &LegalActions) -> Option<Action> {
    let mut rng = rand::thread_rng();
    let mut choices: Vec<Action> = legal.moves.iter().map(|&slot| Action::Move(slot)).collect();

    // Prefer attacking; switch only when forced or out of moves
    if choices.is_empty() || legal.kind == DecisionKind::ForcedSwitch {
        choices = legal.switches.iter().map(|&slot| Action::Switch(slot)).collect();
    }

    choices.choose(&mut rng).copied()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let credentials = match args.next() {
        Some(path) => Credentials::from_file(path)?,
        None => Credentials::Guest(None),
    };
    let battles: usize = args.next().and_then(|n| n.parse().ok()).unwrap_or(1);

    let config = ClientConfig::default().with_credentials(credentials);
    let mut session = BattleSession::connect(config).await?;
    println!("Logged in as {}", session.username());

    let mut wins = 0;
    for battle in 1..=battles {
        let mut signal = session.reset().await?;
        println!(
            "[{}] Playing against {}",
            battle,
            session.state().opponent.name
        );

        while signal == Signal::Decide {
            let Some(action) = session.legal_actions().and_then(pick_action) else {
                break;
            };
            signal = match action {
                Action::Move(slot) => session.submit_move(slot, false, false).await?,
                Action::Switch(slot) => session.submit_switch(slot).await?,
            };
        }

        let state = session.state();
        if state.phase == Phase::Win {
            wins += 1;
        }
        println!(
            "[{}] {:?} after {} turns ({} wins so far)",
            battle, state.phase, state.turn, wins
        );
    }

    session.close().await?;
    Ok(())
}
