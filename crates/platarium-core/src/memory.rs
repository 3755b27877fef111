//! Scoped secret buffers
//!
//! Master seeds and signature seeds live only for the duration of one
//! generate/restore call. [`SecretBytes`] owns such a buffer on the heap,
//! locks the page best-effort so it never reaches swap, and zeroizes it on
//! drop. Because the wipe happens in `Drop`, it runs on every exit path:
//! normal return, `?` propagation and unwinding.
//!
//! [`disable_core_dumps`] is the process-level counterpart and is meant to be
//! called once by binaries at start-up.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use zeroize::Zeroize;

static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// 64-byte BIP-39 seed derived from mnemonic + companion code.
pub type MasterSeed = SecretBytes<64>;

/// 32-byte HKDF output used directly as the signature scalar.
pub type SignatureSeed = SecretBytes<32>;

/// Disable core dumps for the current process.
///
/// Returns `true` if core dumps are (already) disabled.
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        sys::disable_core_dumps()
    }

    #[cfg(not(unix))]
    {
        log::warn!("core dump prevention is not supported on this platform");
        false
    }
}

/// Fixed-size secret held on the heap, wiped when dropped.
pub struct SecretBytes<const N: usize> {
    data: Box<[u8; N]>,
    locked: bool,
}

impl<const N: usize> SecretBytes<N> {
    /// Allocate a zero-filled buffer and try to lock it in memory.
    pub fn zeroed() -> Self {
        let data = Box::new([0u8; N]);

        #[cfg(unix)]
        let locked = N == 0 || sys::lock(data.as_ptr(), N);
        #[cfg(not(unix))]
        let locked = N == 0;

        if !locked {
            log::debug!("mlock of {N}-byte secret buffer failed; contents may be swappable");
        }

        Self { data, locked }
    }

    /// Move `bytes` into a fresh buffer, wiping the caller's copy.
    pub fn take(bytes: &mut [u8; N]) -> Self {
        let mut secret = Self::zeroed();
        secret.data.copy_from_slice(bytes);
        bytes.zeroize();
        secret
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.data
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; N] {
        &mut self.data
    }

    /// Whether the backing page was successfully locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Wipe the contents now; the buffer stays usable (all zeros).
    pub fn wipe(&mut self) {
        self.data.zeroize();
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        self.data.zeroize();

        if self.locked && N > 0 {
            #[cfg(unix)]
            sys::unlock(self.data.as_ptr(), N);
        }
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{N}>(<redacted>)")
    }
}

#[cfg(unix)]
mod sys {
    pub fn disable_core_dumps() -> bool {
        let rlim = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: setrlimit only reads the struct we pass in.
        let rc = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &rlim) };
        if rc != 0 {
            log::warn!(
                "failed to disable core dumps: {}",
                std::io::Error::last_os_error()
            );
            return false;
        }
        true
    }

    pub fn lock(ptr: *const u8, len: usize) -> bool {
        // SAFETY: ptr/len describe a live heap allocation owned by the caller.
        unsafe { libc::mlock(ptr as *const libc::c_void, len) == 0 }
    }

    pub fn unlock(ptr: *const u8, len: usize) -> bool {
        // SAFETY: called with the same region previously passed to `lock`.
        unsafe { libc::munlock(ptr as *const libc::c_void, len) == 0 }
    }
}
