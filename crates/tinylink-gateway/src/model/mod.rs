mod link;

pub use link::{
    ErrorResponse, HealthResponse, InfoQuery, InfoResponse, ShortenRequest, ShortenResponse,
};
