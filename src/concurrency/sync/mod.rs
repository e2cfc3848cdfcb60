//! Blocking primitives and the address-wait helpers they park on.
//!
//! Linux parks on a private futex, Windows on `WaitOnAddress`; other targets
//! fall back to yielding. Loom builds always yield so the model checker can
//! schedule the lock holder.

pub mod node_lock;

pub use node_lock::{NodeLock, NodeLockGuard};

use super::atomic::AtomicU32;
#[cfg(not(any(windows, target_os = "linux", loom)))]
use super::atomic::Ordering;

#[cfg(all(windows, not(loom)))]
use windows_sys::Win32::System::Threading::{WaitOnAddress, WakeByAddressSingle, INFINITE};

#[cfg(all(target_os = "linux", not(loom)))]
use libc::{SYS_futex, FUTEX_PRIVATE_FLAG, FUTEX_WAIT, FUTEX_WAKE};

#[cfg(all(target_os = "linux", not(loom)))]
#[inline]
fn futex_wait(addr: *const u32, expected: u32) {
    // SAFETY: `addr` points at a live `AtomicU32`; the kernel only compares
    // and sleeps, it never writes through the pointer.
    unsafe {
        libc::syscall(
            SYS_futex,
            addr,
            FUTEX_WAIT | FUTEX_PRIVATE_FLAG,
            expected,
            core::ptr::null::<libc::timespec>(),
        );
    }
}

#[cfg(all(target_os = "linux", not(loom)))]
#[inline]
fn futex_wake(addr: *const u32, count: i32) {
    // SAFETY: as above; waking has no effect on memory.
    unsafe {
        libc::syscall(SYS_futex, addr, FUTEX_WAKE | FUTEX_PRIVATE_FLAG, count);
    }
}

/// Blocks while `*addr == expected`.
///
/// May return spuriously; callers re-check their condition in a loop.
#[inline]
pub fn wait_on_u32(addr: &AtomicU32, expected: u32) {
    #[cfg(loom)]
    {
        let _ = (addr, expected);
        loom::thread::yield_now();
    }
    #[cfg(all(target_os = "linux", not(loom)))]
    futex_wait(addr.as_ptr().cast_const(), expected);
    #[cfg(all(windows, not(loom)))]
    // SAFETY: both pointers are valid for `size_of::<u32>()` bytes for the
    // duration of the call.
    unsafe {
        let expected_ptr = (&expected as *const u32).cast::<core::ffi::c_void>();
        let addr_ptr = (addr as *const AtomicU32).cast::<core::ffi::c_void>();
        WaitOnAddress(addr_ptr, expected_ptr, core::mem::size_of::<u32>(), INFINITE);
    }
    #[cfg(not(any(windows, target_os = "linux", loom)))]
    while addr.load(Ordering::Relaxed) == expected {
        std::thread::yield_now();
    }
}

/// Wakes one thread blocked in [`wait_on_u32`] on the same address.
#[inline]
pub fn wake_one_u32(addr: &AtomicU32) {
    #[cfg(loom)]
    let _ = addr;
    #[cfg(all(target_os = "linux", not(loom)))]
    futex_wake(addr.as_ptr().cast_const(), 1);
    #[cfg(all(windows, not(loom)))]
    // SAFETY: `addr` is a live atomic.
    unsafe {
        WakeByAddressSingle((addr as *const AtomicU32).cast::<core::ffi::c_void>());
    }
    #[cfg(not(any(windows, target_os = "linux", loom)))]
    let _ = addr;
}
