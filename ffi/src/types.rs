//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! tagged enums with explicit discriminants. Arrays are handed out as boxed
//! slices so `catalog_free_result` can rebuild them exactly.

use std::ffi::CString;
use std::os::raw::c_char;

use catalog_core::error::ApiError;
use catalog_core::{ListPage, PaginationState, Record};

/// Opaque handle to a `CatalogClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCatalogClient {
    pub(crate) inner: catalog_core::CatalogClient,
}

/// Owned C string; never null. Interior NULs collapse to an empty string.
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Leak `items` as a boxed slice; null when empty.
pub(crate) fn leak_slice<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Reclaim a slice produced by `leak_slice`.
///
/// # Safety
/// `ptr`/`len` must come from a single `leak_slice` call and not be reused.
pub(crate) unsafe fn reclaim_slice<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

fn leak_strings(items: Vec<String>) -> (*mut *mut c_char, u32) {
    leak_slice(items.into_iter().map(c_string).collect::<Vec<_>>())
}

/// # Safety
/// Pointer must be null or come from `CString::into_raw`.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP GET request described as C-compatible plain data.
///
/// Built by `catalog_build_*` functions. The C caller executes the request
/// and passes the response back through `catalog_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: catalog_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = leak_slice(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            url: c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request, then
/// passes a pointer to a `catalog_parse_*` function. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Pagination position passed by value across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiPaginationState {
    pub offset: u32,
    pub page: u32,
    pub total: u32,
}

impl From<PaginationState> for FfiPaginationState {
    fn from(s: PaginationState) -> Self {
        Self {
            offset: s.offset,
            page: s.page,
            total: s.total,
        }
    }
}

impl From<FfiPaginationState> for PaginationState {
    fn from(s: FfiPaginationState) -> Self {
        Self {
            offset: s.offset,
            page: s.page,
            total: s.total,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCatalogResult`.
#[repr(C)]
#[derive(Debug)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Panic = 4,
    NullArg = 5,
}

/// Tag that tells `catalog_free_result` what `FfiCatalogResult::data`
/// points to.
#[repr(C)]
#[derive(Debug)]
pub enum FfiDataTag {
    None = 0,
    Record = 1,
    ListPage = 2,
}

/// A creature exposed to C. `image_url` is null when the record has no
/// sprite.
#[repr(C)]
pub struct FfiRecord {
    pub id: u32,
    pub name: *mut c_char,
    pub height: u32,
    pub weight: u32,
    pub types: *mut *mut c_char,
    pub types_len: u32,
    pub abilities: *mut *mut c_char,
    pub abilities_len: u32,
    pub image_url: *mut c_char,
}

impl FfiRecord {
    fn from_core(record: Record) -> Self {
        let (types, types_len) = leak_strings(record.types);
        let (abilities, abilities_len) = leak_strings(record.abilities);
        Self {
            id: record.id,
            name: c_string(record.name),
            height: record.height,
            weight: record.weight,
            types,
            types_len,
            abilities,
            abilities_len,
            image_url: record.image_url.map_or(std::ptr::null_mut(), c_string),
        }
    }

    /// Free every owned field (but not the struct itself).
    ///
    /// # Safety
    /// Fields must be exactly as produced by `from_core`.
    pub(crate) unsafe fn free_fields(self) {
        unsafe {
            free_c_string(self.name);
            free_c_string(self.image_url);
            for s in reclaim_slice(self.types, self.types_len) {
                free_c_string(s);
            }
            for s in reclaim_slice(self.abilities, self.abilities_len) {
                free_c_string(s);
            }
        }
    }
}

#[repr(C)]
pub struct FfiListItem {
    pub name: *mut c_char,
    pub detail_reference: *mut c_char,
}

/// One page of the listing exposed to C.
#[repr(C)]
pub struct FfiListPage {
    pub count: u32,
    pub items: *mut FfiListItem,
    pub len: u32,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiCatalogResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiCatalogResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiCatalogResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiCatalogResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a single `FfiRecord`.
    pub(crate) fn ok_record(record: Record) -> *mut Self {
        let record = Box::new(FfiRecord::from_core(record));
        Self::ok(FfiDataTag::Record, Box::into_raw(record) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying an `FfiListPage`.
    pub(crate) fn ok_list_page(page: ListPage) -> *mut Self {
        let items: Vec<FfiListItem> = page
            .results
            .into_iter()
            .map(|item| FfiListItem {
                name: c_string(item.name),
                detail_reference: c_string(item.detail_reference),
            })
            .collect();
        let (items, len) = leak_slice(items);
        let page = Box::new(FfiListPage {
            count: page.count,
            items,
            len,
        });
        Self::ok(FfiDataTag::ListPage, Box::into_raw(page) as *mut std::ffi::c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::NotFound => (FfiErrorCode::NotFound, 404),
            ApiError::HttpError { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::DeserializationError(_) => (FfiErrorCode::Deserialization, 0),
        };
        Self::err(code, status, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
