//! C-ABI wrapper around `catalog-core`.
//!
//! # Overview
//! Exposes the sans-IO parts of the catalog (request building, response
//! parsing, pagination arithmetic) through `extern "C"` functions so a
//! non-Rust host can drive the catalog with its own HTTP stack and UI.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `build_*` / `parse_*` mirror `CatalogClient` 1:1.
//! - A single `FfiCatalogResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - Pagination state crosses by value and needs no freeing.
//! - The C caller owns all returned pointers and must call the matching
//!   `catalog_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use catalog_core::http::HttpResponse;
use catalog_core::PaginationState;

use types::*;

/// Borrow a C string as `&str`, treating invalid UTF-8 as empty.
///
/// # Safety
/// `s` must be non-null and NUL-terminated.
unsafe fn borrow_str<'a>(s: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(s) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CatalogClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `catalog_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_client_new(base_url: *const c_char) -> *mut FfiCatalogClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { borrow_str(base_url) };
        let client = catalog_core::CatalogClient::new(url);
        Box::into_raw(Box::new(FfiCatalogClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `CatalogClient` created by `catalog_client_new`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_client_free(client: *mut FfiCatalogClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build a request for one page of the listing.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `catalog_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_build_list_page(
    client: *const FfiCatalogClient,
    limit: u32,
    offset: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_page(limit, offset))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request for a single record by name or numeric id. The key is
/// trimmed and lower-cased.
///
/// Returns null if `client` or `key` is null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_build_record_by_key(
    client: *const FfiCatalogClient,
    key: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || key.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let key = unsafe { borrow_str(key) };
        FfiHttpRequest::from_core(client.inner.build_record_by_key(key))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a request resolving a list item's `detail_reference`.
///
/// Returns null if `client` or `detail_reference` is null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_build_record_by_reference(
    client: *const FfiCatalogClient,
    detail_reference: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || detail_reference.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let reference = unsafe { borrow_str(detail_reference) };
        FfiHttpRequest::from_core(client.inner.build_record_by_reference(reference))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// read as an empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { borrow_str(resp.body) }.to_string()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Parse the response to a `catalog_build_list_page` request.
///
/// Returns a result with `data_tag = ListPage` on success.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_parse_list_page(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCatalogResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCatalogResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_list_page(ffi_response_to_core(resp)) {
            Ok(page) => FfiCatalogResult::ok_list_page(page),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCatalogResult::panic("panic in catalog_parse_list_page"))
}

/// Parse the response to either record request. A 404 yields
/// `error_code = NotFound`, which hosts should treat as an ordinary miss.
///
/// Returns a result with `data_tag = Record` on success.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_parse_record(
    client: *const FfiCatalogClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCatalogResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCatalogResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCatalogResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_record(ffi_response_to_core(resp)) {
            Ok(record) => FfiCatalogResult::ok_record(record),
            Err(e) => FfiCatalogResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCatalogResult::panic("panic in catalog_parse_record"))
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// First page, total unknown.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_new() -> FfiPaginationState {
    PaginationState::new().into()
}

/// Next page, or `state` unchanged on the last page.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_advance(
    state: FfiPaginationState,
    page_size: u32,
) -> FfiPaginationState {
    catch_unwind(|| PaginationState::from(state).advance(page_size).into()).unwrap_or(state)
}

/// Previous page, or `state` unchanged on the first page.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_retreat(
    state: FfiPaginationState,
    page_size: u32,
) -> FfiPaginationState {
    catch_unwind(|| PaginationState::from(state).retreat(page_size).into()).unwrap_or(state)
}

/// Back to page 1, keeping the known total.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_reset(state: FfiPaginationState) -> FfiPaginationState {
    catch_unwind(|| PaginationState::from(state).reset().into()).unwrap_or(state)
}

/// Adopt `count` as the total if none is known yet; later counts are
/// ignored.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_record_total(
    state: FfiPaginationState,
    count: u32,
) -> FfiPaginationState {
    catch_unwind(|| PaginationState::from(state).record_total(count).into()).unwrap_or(state)
}

#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_page_count(state: FfiPaginationState, page_size: u32) -> u32 {
    catch_unwind(|| PaginationState::from(state).page_count(page_size)).unwrap_or(1)
}

#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_can_advance(state: FfiPaginationState, page_size: u32) -> bool {
    catch_unwind(|| PaginationState::from(state).can_advance(page_size)).unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_can_retreat(state: FfiPaginationState) -> bool {
    catch_unwind(|| PaginationState::from(state).can_retreat()).unwrap_or(false)
}

#[unsafe(no_mangle)]
pub extern "C" fn catalog_pagination_controls_visible(
    state: FfiPaginationState,
    page_size: u32,
    has_active_search_term: bool,
) -> bool {
    catch_unwind(|| {
        PaginationState::from(state).controls_visible(page_size, has_active_search_term)
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `catalog_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            for h in reclaim_slice(req.headers, req.headers_len) {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiCatalogResult` returned by any `catalog_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points
/// to.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_free_result(result: *mut FfiCatalogResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Record => {
                let record = unsafe { Box::from_raw(result.data as *mut FfiRecord) };
                unsafe { (*record).free_fields() };
            }
            FfiDataTag::ListPage => {
                let page = unsafe { Box::from_raw(result.data as *mut FfiListPage) };
                for item in unsafe { reclaim_slice(page.items, page.len) } {
                    unsafe {
                        free_c_string(item.name);
                        free_c_string(item.detail_reference);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn catalog_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    const BASE: &str = "http://localhost:3000/api/v2/pokemon";

    fn new_client() -> *mut FfiCatalogClient {
        let url = CString::new(BASE).unwrap();
        catalog_client_new(url.as_ptr())
    }

    fn read(s: *const c_char) -> String {
        unsafe { CStr::from_ptr(s) }.to_str().unwrap().to_string()
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        catalog_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        let client = catalog_client_new(std::ptr::null());
        assert!(client.is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        catalog_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_page_returns_correct_request() {
        let client = new_client();
        let req = catalog_build_list_page(client, 20, 40);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(read(req_ref.url), format!("{BASE}?limit=20&offset=40"));
        assert_eq!(req_ref.headers_len, 1);
        let header = unsafe { &*req_ref.headers };
        assert_eq!(read(header.key), "accept");
        assert_eq!(read(header.value), "application/json");

        catalog_free_request(req);
        catalog_client_free(client);
    }

    #[test]
    fn build_list_page_null_client_returns_null() {
        let req = catalog_build_list_page(std::ptr::null(), 20, 0);
        assert!(req.is_null());
    }

    #[test]
    fn build_record_by_key_normalizes() {
        let client = new_client();
        let key = CString::new("  Pikachu ").unwrap();
        let req = catalog_build_record_by_key(client, key.as_ptr());
        assert!(!req.is_null());

        let url = read(unsafe { &*req }.url);
        assert_eq!(url, format!("{BASE}/pikachu"));

        catalog_free_request(req);
        catalog_client_free(client);
    }

    #[test]
    fn build_record_by_key_null_key_returns_null() {
        let client = new_client();
        let req = catalog_build_record_by_key(client, std::ptr::null());
        assert!(req.is_null());
        catalog_client_free(client);
    }

    #[test]
    fn build_record_by_reference_is_verbatim() {
        let client = new_client();
        let reference = CString::new("http://other/pokemon/7/").unwrap();
        let req = catalog_build_record_by_reference(client, reference.as_ptr());

        assert_eq!(read(unsafe { &*req }.url), "http://other/pokemon/7/");

        catalog_free_request(req);
        catalog_client_free(client);
    }

    #[test]
    fn parse_list_page_two_items() {
        let client = new_client();
        let body = CString::new(
            r#"{"count":151,"next":null,"previous":null,"results":[
                {"name":"bulbasaur","url":"http://x/1/"},
                {"name":"ivysaur","url":"http://x/2/"}
            ]}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = catalog_parse_list_page(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(r.error_message.is_null());
        assert!(matches!(r.data_tag, FfiDataTag::ListPage));

        let page = unsafe { &*(r.data as *const FfiListPage) };
        assert_eq!(page.count, 151);
        assert_eq!(page.len, 2);
        let items = unsafe { std::slice::from_raw_parts(page.items, page.len as usize) };
        assert_eq!(read(items[0].name), "bulbasaur");
        assert_eq!(read(items[1].detail_reference), "http://x/2/");

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_list_page_empty_results() {
        let client = new_client();
        let body = CString::new(r#"{"count":0,"results":[]}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = catalog_parse_list_page(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));

        let page = unsafe { &*(r.data as *const FfiListPage) };
        assert_eq!(page.len, 0);
        assert!(page.items.is_null());

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_record_success() {
        let client = new_client();
        let body = CString::new(
            r#"{"id":25,"name":"pikachu","height":4,"weight":60,
                "types":[{"slot":1,"type":{"name":"electric","url":""}}],
                "abilities":[{"ability":{"name":"static","url":""}},{"ability":{"name":"lightning-rod","url":""}}],
                "sprites":{"front_default":"http://img/25.png"}}"#,
        )
        .unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = catalog_parse_record(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Ok));
        assert!(matches!(r.data_tag, FfiDataTag::Record));

        let record = unsafe { &*(r.data as *const FfiRecord) };
        assert_eq!(record.id, 25);
        assert_eq!(read(record.name), "pikachu");
        assert_eq!(record.types_len, 1);
        assert_eq!(record.abilities_len, 2);
        let abilities =
            unsafe { std::slice::from_raw_parts(record.abilities, record.abilities_len as usize) };
        assert_eq!(read(abilities[1]), "lightning-rod");
        assert_eq!(read(record.image_url), "http://img/25.png");

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_record_without_image_has_null_url() {
        let client = new_client();
        let body = CString::new(r#"{"id":1,"name":"bulbasaur"}"#).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = catalog_parse_record(client, &resp);
        let record = unsafe { &*((*result).data as *const FfiRecord) };
        assert!(record.image_url.is_null());
        assert!(record.types.is_null());
        assert_eq!(record.types_len, 0);

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_record_not_found() {
        let client = new_client();
        let body = CString::new("Not Found").unwrap();
        let resp = FfiHttpResponse {
            status: 404,
            body: body.as_ptr(),
        };
        let result = catalog_parse_record(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NotFound));
        assert_eq!(r.http_status, 404);
        assert!(!r.error_message.is_null());
        assert!(r.data.is_null());

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_record_server_error() {
        let client = new_client();
        let resp = FfiHttpResponse {
            status: 500,
            body: std::ptr::null(),
        };
        let result = catalog_parse_record(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Http));
        assert_eq!(r.http_status, 500);

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_record_bad_json() {
        let client = new_client();
        let body = CString::new("<html>").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = catalog_parse_record(client, &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::Deserialization));

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn parse_null_client_returns_null_arg() {
        let body = CString::new("{}").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = catalog_parse_list_page(std::ptr::null(), &resp);
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NullArg));
        assert_eq!(read(r.error_message), "null argument: client");

        catalog_free_result(result);
    }

    #[test]
    fn parse_null_response_returns_null_arg() {
        let client = new_client();
        let result = catalog_parse_record(client, std::ptr::null());
        let r = unsafe { &*result };
        assert!(matches!(r.error_code, FfiErrorCode::NullArg));

        catalog_free_result(result);
        catalog_client_free(client);
    }

    #[test]
    fn pagination_walks_forward_and_back() {
        let state = catalog_pagination_record_total(catalog_pagination_new(), 150);
        assert_eq!(state, FfiPaginationState { offset: 0, page: 1, total: 150 });
        assert_eq!(catalog_pagination_page_count(state, 20), 8);
        assert!(catalog_pagination_can_advance(state, 20));
        assert!(!catalog_pagination_can_retreat(state));

        let next = catalog_pagination_advance(state, 20);
        assert_eq!(next, FfiPaginationState { offset: 20, page: 2, total: 150 });
        assert_eq!(catalog_pagination_retreat(next, 20), state);
        assert_eq!(catalog_pagination_reset(next), state);
    }

    #[test]
    fn pagination_total_is_frozen() {
        let state = catalog_pagination_record_total(catalog_pagination_new(), 150);
        assert_eq!(catalog_pagination_record_total(state, 9).total, 150);
    }

    #[test]
    fn pagination_hides_single_page_during_search() {
        let state = FfiPaginationState { offset: 0, page: 1, total: 5 };
        assert!(catalog_pagination_controls_visible(state, 20, false));
        assert!(!catalog_pagination_controls_visible(state, 20, true));
    }

    #[test]
    fn free_request_null_is_safe() {
        catalog_free_request(std::ptr::null_mut());
    }

    #[test]
    fn free_result_null_is_safe() {
        catalog_free_result(std::ptr::null_mut());
    }

    #[test]
    fn free_string_null_is_safe() {
        catalog_free_string(std::ptr::null_mut());
    }
}
