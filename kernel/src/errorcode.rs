// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Standard error enum for driver operations.

/// Errors returned by drivers and by the host-side frameworks they plug into.
///
/// There are no success cases: operations return `Result<(), ErrorCode>` (or
/// `Result<T, ErrorCode>`) and use `?` to propagate failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorCode {
    /// Generic failure condition, including a failed bus transfer
    FAIL = 1,
    /// Underlying system is busy; retry
    BUSY = 2,
    /// The state requested is already set
    ALREADY = 3,
    /// The component is powered down or was never probed
    OFF = 4,
    /// An invalid parameter was passed
    INVAL = 6,
    /// Parameter passed was too large
    SIZE = 7,
    /// Memory required not available
    NOMEM = 9,
    /// Operation or command is unsupported
    NOSUPPORT = 10,
    /// Device does not exist
    NODEVICE = 11,
}

impl ErrorCode {
    /// Negative errno value used when the error crosses into a host that
    /// speaks integer error codes.
    pub const fn to_errno(self) -> i32 {
        match self {
            ErrorCode::FAIL => -5,       // EIO
            ErrorCode::BUSY => -16,      // EBUSY
            ErrorCode::ALREADY => -114,  // EALREADY
            ErrorCode::OFF => -19,       // ENODEV
            ErrorCode::INVAL => -22,     // EINVAL
            ErrorCode::SIZE => -75,      // EOVERFLOW
            ErrorCode::NOMEM => -12,     // ENOMEM
            ErrorCode::NOSUPPORT => -95, // EOPNOTSUPP
            ErrorCode::NODEVICE => -19,  // ENODEV
        }
    }
}

impl From<ErrorCode> for usize {
    fn from(err: ErrorCode) -> usize {
        err as usize
    }
}

/// Convert a `Result<(), ErrorCode>` into the integer convention where zero
/// is success and failures are negative errno values.
pub fn into_errno(res: Result<(), ErrorCode>) -> i32 {
    match res {
        Ok(()) => 0,
        Err(e) => e.to_errno(),
    }
}
