//! C-ABI wrapper around `greyhound-core`.
//!
//! # Overview
//! Lets a workflow host written in any language with a C FFI load the
//! GREYHOUND node: it passes each record's form values as JSON, executes the
//! returned request with its own HTTP helper, and hands the response back to
//! get output records.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiGreyhoundResult` envelope with `FfiDataTag` + `void* data`
//!   conveys requests, output records and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `greyhound_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::sync::Once;

use greyhound_core::{
    GreyhoundClient, GreyhoundCredentials, HttpResponse, NodeDescription, NodeError,
    NodeParameters, NodeProfile, OutputRecord,
};
use tracing_subscriber::EnvFilter;

use types::*;

static TRACING_INIT: Once = Once::new();

/// Read a C string argument; null or invalid UTF-8 reads as `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Profile code used across the C surface: 0 = full, 1 = read-only.
fn profile_from_code(code: u32) -> NodeProfile {
    match code {
        1 => NodeProfile::ReadOnly,
        _ => NodeProfile::Full,
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG` (default
/// `info`). Only the first call has any effect.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_init_logging() {
    let _ = catch_unwind(|| {
        TRACING_INIT.call_once(|| {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        });
    });
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client from the decrypted credentials.
///
/// `profile` is 0 for the full node, 1 for the read-only variant.
/// Returns null if any argument is null or blank, or if an internal panic
/// occurs. The caller must free the returned pointer with
/// `greyhound_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_client_new(
    base_url: *const c_char,
    username: *const c_char,
    password: *const c_char,
    profile: u32,
) -> *mut FfiGreyhoundClient {
    catch_unwind(|| {
        let (Some(base_url), Some(username), Some(password)) =
            (read_str(base_url), read_str(username), read_str(password))
        else {
            return std::ptr::null_mut();
        };
        let creds = GreyhoundCredentials::new(base_url, username, password);
        if let Err(e) = creds.validate() {
            tracing::warn!(error = %e, "rejected incomplete credentials");
            return std::ptr::null_mut();
        }
        let inner = GreyhoundClient::with_profile(&creds, profile_from_code(profile));
        Box::into_raw(Box::new(FfiGreyhoundClient { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `greyhound_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_client_free(client: *mut FfiGreyhoundClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Request building and response parsing
// ---------------------------------------------------------------------------

/// Build the HTTP request for one input record.
///
/// `params_json` is the record's form values as a JSON object
/// (`resource`, `operation`, ids, `additionalFields`, creation fields).
/// Returns a result with `data_tag = Request` on success.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_build_request(
    client: *const FfiGreyhoundClient,
    params_json: *const c_char,
) -> *mut FfiGreyhoundResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiGreyhoundResult::null_arg("client");
        }
        let Some(raw) = read_str(params_json) else {
            return FfiGreyhoundResult::null_arg("params_json");
        };
        let client = unsafe { &*client };
        let form: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                return FfiGreyhoundResult::from_error(NodeError::InvalidParameter {
                    field: "parameters",
                    message: e.to_string(),
                })
            }
        };
        match NodeParameters::from_form(&form).and_then(|p| client.inner.build_request(&p)) {
            Ok(req) => FfiGreyhoundResult::ok_request(req),
            Err(e) => FfiGreyhoundResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiGreyhoundResult::panic("panic in greyhound_build_request"))
}

/// Parse the response to a request built for input record `paired_item`.
///
/// Returns a result with `data_tag = Records` on success.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_parse_response(
    client: *const FfiGreyhoundClient,
    response: *const FfiHttpResponse,
    paired_item: u32,
) -> *mut FfiGreyhoundResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiGreyhoundResult::null_arg("client");
        }
        if response.is_null() {
            return FfiGreyhoundResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        // A null body is an empty body. A 2xx body that is not UTF-8 cannot be
        // JSON; error bodies are only carried as text.
        let body = if resp.body.is_null() {
            String::new()
        } else {
            let raw = unsafe { CStr::from_ptr(resp.body) };
            match raw.to_str() {
                Ok(s) => s.to_string(),
                Err(e) if (200..300).contains(&resp.status) => {
                    return FfiGreyhoundResult::from_error(NodeError::Deserialization(
                        e.to_string(),
                    ))
                }
                Err(_) => raw.to_string_lossy().into_owned(),
            }
        };
        let core_resp = HttpResponse {
            status: resp.status,
            headers: Vec::new(),
            body,
        };
        match client.inner.parse_response(core_resp, paired_item as usize) {
            Ok(records) => FfiGreyhoundResult::ok_records(&records),
            Err(e) => FfiGreyhoundResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiGreyhoundResult::panic("panic in greyhound_parse_response"))
}

/// JSON array holding the single `{"error": message}` record a host emits
/// for a failed record under continue-on-fail. Returns null if `message` is
/// null. Free with `greyhound_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_error_records(message: *const c_char, paired_item: u32) -> *mut c_char {
    catch_unwind(|| {
        let Some(message) = read_str(message) else {
            return std::ptr::null_mut();
        };
        let records = [OutputRecord::error(message, paired_item as usize)];
        match serde_json::to_string(&records) {
            Ok(json) => c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The node's UI description as JSON. Free with `greyhound_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_node_description(profile: u32) -> *mut c_char {
    catch_unwind(|| {
        match serde_json::to_string(&NodeDescription::for_profile(profile_from_code(profile))) {
            Ok(json) => c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_request(req: *mut FfiHttpRequest) {
    let req = unsafe { Box::from_raw(req) };
    if !req.url.is_null() {
        drop(unsafe { CString::from_raw(req.url) });
    }
    if !req.body.is_null() {
        drop(unsafe { CString::from_raw(req.body) });
    }
    if !req.headers.is_null() && req.headers_len > 0 {
        let headers: Box<[FfiHeader]> = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                req.headers,
                req.headers_len as usize,
            ))
        };
        for h in headers.iter() {
            if !h.key.is_null() {
                drop(unsafe { CString::from_raw(h.key) });
            }
            if !h.value.is_null() {
                drop(unsafe { CString::from_raw(h.value) });
            }
        }
    }
}

/// Free a result returned by `greyhound_build_request` or
/// `greyhound_parse_response`. Safe to call with null. Uses `data_tag` to
/// determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_free_result(result: *mut FfiGreyhoundResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Request => free_request(result.data as *mut FfiHttpRequest),
                FfiDataTag::Records => {
                    drop(unsafe { CString::from_raw(result.data as *mut c_char) });
                }
                FfiDataTag::None => {}
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn greyhound_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
