pub mod engine;
pub mod matcher;
pub mod qualification;
pub mod report;

pub use crate::domain::model::{
    BatchReport, CandidateSet, DomainRecord, KeywordList, QualificationResult, QualificationStatus,
};
pub use crate::domain::ports::{KeywordSource, Pipeline, Storage};
pub use crate::utils::error::Result;
