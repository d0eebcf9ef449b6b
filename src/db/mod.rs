pub mod comments;
pub mod helpers;
pub mod matches;
pub mod predictions;
pub mod users;
