// Candidate valuation: scarcity estimation, multi-factor scoring, ranking.

pub mod rank;
pub mod scarcity;
pub mod scoring;
