//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests cross as C structs so the host can hand them straight to its HTTP
//! helper. Output records cross as one JSON string: their `json` payload is
//! arbitrary, and the host consumes JSON anyway. Conversion functions live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use greyhound_core::{HttpMethod, NodeError, OutputRecord};

/// Opaque handle to a `GreyhoundClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiGreyhoundClient {
    pub(crate) inner: greyhound_core::GreyhoundClient,
}

/// Interior NULs cannot cross as C strings; they are stripped.
pub(crate) fn c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default().into_raw()
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `url` already includes the encoded query string. `body` is null for GET.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: greyhound_core::HttpRequest) -> *mut Self {
        let url = c_string(req.full_url());
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to `greyhound_parse_response`. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiGreyhoundResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Panic = 5,
    NullArg = 6,
    InvalidParameters = 7,
    Unsupported = 8,
    Transport = 9,
}

/// Tag that tells `greyhound_free_result` what `FfiGreyhoundResult::data`
/// points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    /// `data` is an `FfiHttpRequest*`.
    Request = 1,
    /// `data` is a `char*` holding a JSON array of output records.
    Records = 2,
}

/// Result envelope for every fallible operation.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`). On failure `error_code`
/// describes the category, `error_message` is the text the host should put
/// in an error record, and `data` is null.
#[repr(C)]
pub struct FfiGreyhoundResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiGreyhoundResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiGreyhoundResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a request to execute.
    pub(crate) fn ok_request(req: greyhound_core::HttpRequest) -> *mut Self {
        let data = FfiHttpRequest::from_core(req) as *mut std::ffi::c_void;
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), 0, FfiDataTag::Request, data)
    }

    /// Build a success result carrying output records as JSON.
    pub(crate) fn ok_records(records: &[OutputRecord]) -> *mut Self {
        match serde_json::to_string(records) {
            Ok(json) => Self::boxed(
                FfiErrorCode::Ok,
                std::ptr::null_mut(),
                0,
                FfiDataTag::Records,
                c_string(json) as *mut std::ffi::c_void,
            ),
            Err(e) => Self::from_error(NodeError::Serialization(e.to_string())),
        }
    }

    /// Build an error result from a `NodeError`.
    pub(crate) fn from_error(err: NodeError) -> *mut Self {
        let (error_code, http_status) = match &err {
            NodeError::NotFound => (FfiErrorCode::NotFound, 404u16),
            NodeError::Http { status, .. } => (FfiErrorCode::Http, *status),
            NodeError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            NodeError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            NodeError::MissingParameter(_)
            | NodeError::InvalidParameter { .. }
            | NodeError::MissingCredential(_) => (FfiErrorCode::InvalidParameters, 0),
            NodeError::UnsupportedOperation { .. } => (FfiErrorCode::Unsupported, 0),
            NodeError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        Self::boxed(
            error_code,
            c_string(err.message()),
            http_status,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            c_string(format!("null argument: {name}")),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Panic,
            c_string(msg.to_string()),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}
