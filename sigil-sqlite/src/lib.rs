mod cbox;
mod connection;
mod driver;
mod extract;
mod prepared;

use sigil_core::{Error, Result};
use std::{
    ffi::{CStr, c_char, c_int},
    ptr,
};

pub(crate) use cbox::*;
pub use connection::*;
pub use driver::*;
pub use prepared::*;

pub(crate) fn error_message_from_ptr(ptr: &'_ *const c_char) -> &'_ str {
    unsafe {
        if *ptr != ptr::null() {
            CStr::from_ptr(*ptr)
                .to_str()
                .unwrap_or("Unknown error (the error message was not a valid C string)")
        } else {
            "Unknown error (could not extract the error message)"
        }
    }
}

/// Byte count of a buffer handed to sqlite, which takes it as a C int.
pub(crate) fn byte_length(len: usize) -> Result<c_int> {
    c_int::try_from(len).map_err(|_| {
        Error::msg(format!(
            "Cannot pass {} bytes to sqlite, the limit is {} bytes",
            len,
            c_int::MAX
        ))
    })
}
