// Resume ranking for the admin portal.
// Scores a batch of resumes against one job description and ranks them.

pub mod handlers;
pub mod prompts;
pub mod ranker;
pub mod upload;
