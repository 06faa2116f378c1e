mod scenario_a_upcoming;
mod scenario_b_live_vote;
mod scenario_c_double_vote;
mod scenario_d_known_candidate;
