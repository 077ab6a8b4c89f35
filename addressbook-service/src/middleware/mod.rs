//! HTTP middleware

pub mod request_tracking;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer,
    sensitive_response_headers_layer, REQUEST_ID_HEADER, SENSITIVE_HEADERS,
};
