//! Turnstile demonstration
//!
//! Builds the classic coin/push turnstile, prints the initial state, feeds
//! a batch of events echoing each state, then prints the final state.
//!
//! Run with: cargo run -- coin push
//! Set RUST_LOG=debug to trace every transition.

use rulefsm::{rules, MachineError, StateMachine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut machine = StateMachine::init("locked");
    let locked = machine.initial_state().clone();
    let unlocked = machine.make_state("unlocked");

    let coin = rules! { "eq" => "coin" };
    let push = rules! { "eq" => "push" };

    machine.link_states(&locked, &unlocked, coin.clone())?;
    machine.link_states(&unlocked, &locked, push.clone())?;
    machine.link_states(&locked, &locked, push)?;
    machine.link_states(&unlocked, &unlocked, coin)?;

    if let stillwater::validation::Validation::Failure(violations) = machine.validate() {
        for violation in violations.iter() {
            tracing::warn!("{}", violation);
        }
    }

    println!("Initial state --- {}", machine.current_state());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let events = if args.is_empty() {
        vec!["coin".to_string(), "push".to_string()]
    } else {
        args
    };

    let mut stdout = std::io::stdout().lock();
    let run = machine.compute_to(&events, &mut stdout)?;
    for error in run.errors() {
        tracing::error!("{}", error);
    }

    println!("Final state --- {}", run.final_state());
    Ok(())
}
