// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Result tallying

use lp_api_contract::{OptionTally, Poll, PollResults, Session};

/// Build the results view of `poll` against the participants of `session`
///
/// Percentages are relative to the number of participants in the session,
/// not the number of ballots cast, so with `maxVotes > 1` they may sum past
/// 100. An empty session yields 0 for every option. Ballots are reset when a
/// poll is created, so `voted` only describes the most recent poll.
pub fn tally(session: &Session, poll: &Poll) -> PollResults {
    let participants = session.participant_count();
    let options = poll
        .options
        .iter()
        .map(|option| {
            let votes = poll.votes_for(option);
            OptionTally {
                option: option.clone(),
                votes,
                percent: percent(votes, participants),
            }
        })
        .collect();

    PollResults {
        question: poll.question.clone(),
        max_votes: poll.max_votes,
        active: poll.active,
        participants,
        voted: session.voted_count(),
        options,
    }
}

fn percent(votes: u64, participants: usize) -> f64 {
    if participants == 0 {
        0.0
    } else {
        votes as f64 / participants as f64 * 100.0
    }
}
