//! Reputation Service Module
//!
//! StopForumSpam lookups for registration screening. The client performs a
//! single GET per lookup and maps every transport or payload problem onto
//! `SpamCheckError`, leaving the fail-open decision to `nb_core::SpamChecker`.

pub mod stop_forum_spam;

pub use stop_forum_spam::StopForumSpamClient;

#[cfg(test)]
mod tests;
