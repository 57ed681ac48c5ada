pub mod attribute_request;
pub mod register_request;

pub use attribute_request::{CreateAddressRequest, CreateCardRequest};
pub use register_request::RegisterRequest;
