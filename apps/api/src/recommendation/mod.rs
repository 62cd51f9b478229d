// Job recommendations for the student portal.
// Scores every open job against the student's profile and ranks them.

pub mod handlers;
pub mod prompts;
pub mod recommender;
