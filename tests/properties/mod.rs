mod deploy_idempotence;
mod handle_round_trip;
mod sync_convergence;
mod undeployed_vote;
