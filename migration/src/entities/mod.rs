pub mod choice;
pub mod poll;
pub mod vote;

pub use choice::Entity as ChoiceEntity;
pub use poll::Entity as PollEntity;
pub use vote::Entity as VoteEntity;
