use libc::{c_double, c_uint, c_void, size_t};
use std::ptr;
use std::slice;

use crate::{jenks_breaks, JenksErr};

/// Wrapper for a void pointer to a sequence of floats, and the sequence length. Used for FFI,
/// both for data to be classified and for the resulting breaks.
///
/// `data` is a `Vec<c_double>`.
#[repr(C)]
pub struct ExternalArray {
    pub data: *const c_void,
    pub len: size_t,
}

/// We don't need to take ownership of incoming data to be classified
impl From<&ExternalArray> for &[f64] {
    fn from(arr: &ExternalArray) -> Self {
        if arr.len == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(arr.data as *const c_double, arr.len) }
    }
}

// Leak breaks across the FFI boundary
impl From<Vec<f64>> for ExternalArray {
    fn from(v: Vec<f64>) -> Self {
        let boxed = v.into_boxed_slice();
        let blen = boxed.len();
        let rawp = Box::into_raw(boxed);
        ExternalArray {
            data: rawp as *const c_void,
            len: blen as size_t,
        }
    }
}

// Reconstitute breaks that have been returned across the FFI boundary so they can be dropped
impl From<ExternalArray> for Vec<f64> {
    fn from(arr: ExternalArray) -> Self {
        // we originated this data, so pointer-to-slice -> box -> vec
        unsafe {
            let p = ptr::slice_from_raw_parts_mut(arr.data as *mut f64, arr.len);
            Box::from_raw(p).into_vec()
        }
    }
}

fn breaks_from_external(data: &ExternalArray, classes: c_uint) -> Result<Vec<f64>, JenksErr> {
    let values: &[f64] = data.into();
    jenks_breaks(values, usize::try_from(classes)?)
}

/// Classify `data` into `classes` Jenks classes, returning the breaks.
///
/// Invalid input (for instance NaN values) produces an empty array. The result must be
/// freed with [`drop_jenks_result`].
#[unsafe(no_mangle)]
pub extern "C" fn jenks_ffi(data: &ExternalArray, classes: c_uint) -> ExternalArray {
    breaks_from_external(data, classes)
        .unwrap_or_default()
        .into()
}

#[unsafe(no_mangle)]
pub extern "C" fn drop_jenks_result(result: ExternalArray) {
    let _: Vec<f64> = result.into();
}
