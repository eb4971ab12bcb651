use crate::storage::models::{ChoiceTally, Poll, PollSummary};
use migration::entities::poll;

use super::query::{PollSummaryRow, TallyRow};

/// 将 Sea-ORM Model 转换为 Poll
pub fn model_to_poll(model: poll::Model) -> Poll {
    Poll {
        id: model.id,
        question: model.question,
        pub_date: model.pub_date,
    }
}

/// COUNT 结果不会为负，这里仍然做一次收敛
fn count_to_u64(count: i64) -> u64 {
    count.max(0) as u64
}

pub(super) fn row_to_tally(row: TallyRow) -> ChoiceTally {
    ChoiceTally {
        choice_id: row.choice_id,
        choice_text: row.choice_text,
        vote_count: count_to_u64(row.vote_count),
    }
}

pub(super) fn row_to_summary(row: PollSummaryRow) -> PollSummary {
    PollSummary {
        id: row.id,
        question: row.question,
        pub_date: row.pub_date,
        total_votes: count_to_u64(row.total_votes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_model_to_poll() {
        let now = Utc::now();
        let poll = model_to_poll(poll::Model {
            id: 3,
            question: "Favourite editor?".to_string(),
            pub_date: now,
        });
        assert_eq!(poll.id, 3);
        assert_eq!(poll.question, "Favourite editor?");
        assert_eq!(poll.pub_date, now);
    }

    #[test]
    fn test_row_to_tally_clamps_negative() {
        let tally = row_to_tally(TallyRow {
            choice_id: 1,
            choice_text: "Vim".to_string(),
            vote_count: -1,
        });
        assert_eq!(tally.vote_count, 0);
    }
}
