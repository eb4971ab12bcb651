//! Sample data seeding
//!
//! Creates a fixed set of demo polls with a known vote distribution. Used by
//! the `seed` command.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::errors::Result;
use crate::storage::SeaOrmStorage;

pub struct SamplePoll {
    pub question: &'static str,
    pub choices: &'static [(&'static str, u32)],
}

pub const SAMPLE_POLLS: &[SamplePoll] = &[
    SamplePoll {
        question: "Which programming language do you like most?",
        choices: &[
            ("Python", 45),
            ("JavaScript", 30),
            ("Java", 15),
            ("C++", 7),
            ("Go", 3),
        ],
    },
    SamplePoll {
        question: "Which web framework do you prefer?",
        choices: &[("Django", 50), ("Flask", 25), ("FastAPI", 20), ("Tornado", 5)],
    },
    SamplePoll {
        question: "Which operating system do you use?",
        choices: &[("Windows", 40), ("Linux", 35), ("macOS", 20), ("Other", 5)],
    },
    SamplePoll {
        question: "How do you prefer to learn?",
        choices: &[
            ("Online courses", 35),
            ("Books", 20),
            ("Video lessons", 25),
            ("Practice", 15),
            ("Mentoring", 5),
        ],
    },
    SamplePoll {
        question: "How many hours a day do you program?",
        choices: &[
            ("1-2 hours", 15),
            ("3-5 hours", 40),
            ("6-8 hours", 30),
            ("More than 8 hours", 15),
        ],
    },
];

/// 导入结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub removed_polls: u64,
    pub created_polls: u64,
    pub created_votes: u64,
}

/// 发布时间：1 到 30 天前
fn random_pub_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(rand::random_range(1..=30))
}

/// 投票时间：发布时间与当前时间之间
fn random_vote_time(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let span = (now - pub_date).num_seconds().max(1);
    pub_date + Duration::seconds(rand::random_range(0..=span))
}

pub async fn seed_sample_data(storage: &SeaOrmStorage, clear: bool) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if clear {
        report.removed_polls = storage.delete_all_polls().await?;
    }

    let now = Utc::now();
    for sample in SAMPLE_POLLS {
        let pub_date = random_pub_date(now);
        let poll = storage.create_poll(sample.question, Some(pub_date)).await?;

        let mut poll_votes = 0;
        for (text, votes) in sample.choices {
            let choice_id = storage.add_choice(poll.id, text).await?;
            let timestamps: Vec<DateTime<Utc>> = (0..*votes)
                .map(|_| random_vote_time(pub_date, now))
                .collect();
            poll_votes += storage.cast_votes(choice_id, &timestamps).await?;
        }

        info!(
            "Sample poll created: \"{}\" with {} votes",
            poll.question, poll_votes
        );
        report.created_polls += 1;
        report.created_votes += poll_votes;
    }

    Ok(report)
}
