// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApprovalStatus, MatchCandidate, MatchOutcome, MatchingStatus, NewRequest, ReliefRequest,
    Resource,
};
pub use requests::{ApproveRequestBody, SubmitRequestBody};
pub use responses::{
    BatchUpdateResponse, DecisionResponse, ErrorResponse, HealthResponse, RematchResponse,
    SubmitResponse,
};
