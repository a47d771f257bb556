//! Buffer lifecycle and element FFI: create, destroy, read, append, pop,
//! insert, remove, resize, metrics.
//!
//! Uses per-buffer `Arc<Mutex<ErasedBuffer>>` so the global `BUFFERS` table
//! lock is only held for handle lookup. Element destructors therefore run
//! without the table lock and may call into growbuf for *other* buffers.
//! A destructor must not call back into the buffer that is destroying it.
//!
//! Elements cross the boundary by copy: inputs are read from
//! `element_size` caller bytes, outputs are written into a caller buffer of
//! at least `element_size` bytes. Popping or removing hands ownership of the
//! element to the caller, so its destructor is **not** run.

use std::sync::{Arc, Mutex};

use growbuf_arena::{BufferConfig, ErasedBuffer};
use growbuf_core::{CapacityManaged, ElementDestructor, NoopDestructor, ResizeMode};

use crate::handle::HandleTable;
use crate::metrics::GrowbufMetrics;
use crate::status::GrowbufStatus;

/// Element destructor supplied by C.
///
/// Called once per destroyed element with a pointer to its bytes and the
/// element size.
pub type GrowbufDestructorFn = unsafe extern "C" fn(element: *mut u8, len: usize);

type BufferArc = Arc<Mutex<ErasedBuffer>>;

static BUFFERS: Mutex<HandleTable<BufferArc>> = Mutex::new(HandleTable::new());

/// Adapts a C function pointer to [`ElementDestructor`].
struct CDestructor(GrowbufDestructorFn);

impl ElementDestructor for CDestructor {
    #[allow(unsafe_code)]
    fn destroy(&self, element: &mut [u8]) {
        // SAFETY: the pointer was registered through growbuf_create, whose
        // contract requires it to accept any element-sized block it is given.
        unsafe { (self.0)(element.as_mut_ptr(), element.len()) }
    }
}

/// Clone the Arc for a buffer handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the mutex is poisoned.
fn get_buffer(handle: u64) -> Option<BufferArc> {
    BUFFERS.lock().ok()?.get(handle).cloned()
}

/// Copy `element` into `out`.
///
/// # Safety
///
/// `out` must be non-null and valid for `element.len()` byte writes.
#[allow(unsafe_code)]
unsafe fn write_element(element: &[u8], out: *mut u8) {
    std::ptr::copy_nonoverlapping(element.as_ptr(), out, element.len());
}

/// Build a buffer and store it in `table`.
///
/// Nothing is built when the table is full, so a failure never runs the
/// destructor on the caller's element.
fn register(
    table: &mut HandleTable<BufferArc>,
    initial: &[u8],
    config: BufferConfig,
    destructor: Arc<dyn ElementDestructor>,
) -> Result<u64, GrowbufStatus> {
    if table.is_full() {
        return Err(GrowbufStatus::InternalError);
    }
    let buffer = ErasedBuffer::new(initial, config, destructor)
        .map_err(|e| GrowbufStatus::from(&e))?;
    table
        .insert(Arc::new(Mutex::new(buffer)))
        .ok_or(GrowbufStatus::InternalError)
}

/// Create a buffer holding a copy of the `element_size` bytes at `data`.
///
/// `destructor` may be null for plain-old-data elements. On success, writes
/// the handle to `buffer_out` and returns `GROWBUF_STATUS_OK`. On failure the
/// initial element still belongs to the caller.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_create(
    data: *const u8,
    element_size: usize,
    initial_capacity: usize,
    destructor: Option<GrowbufDestructorFn>,
    buffer_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if data.is_null() || buffer_out.is_null() || element_size == 0 {
            return GrowbufStatus::InvalidArgument as i32;
        }
        // SAFETY: data points to element_size readable bytes per caller contract.
        let initial = unsafe { std::slice::from_raw_parts(data, element_size) };

        let destructor: Arc<dyn ElementDestructor> = match destructor {
            Some(f) => Arc::new(CDestructor(f)),
            None => Arc::new(NoopDestructor),
        };

        // Lock before building: a buffer built but never stored would
        // destroy its copy of the caller's element on drop.
        let mut buffers = ffi_lock!(BUFFERS);
        let config = BufferConfig::new(initial_capacity);
        let handle = match register(&mut buffers, initial, config, destructor) {
            Ok(h) => h,
            Err(status) => return status as i32,
        };
        // SAFETY: buffer_out is valid per caller contract.
        unsafe { *buffer_out = handle };
        GrowbufStatus::Ok as i32
    })
}

/// Destroy every populated element and release the buffer.
///
/// The handle is invalid afterwards; destroying it again returns
/// `GROWBUF_STATUS_INVALID_HANDLE`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_destroy(buffer_handle: u64) -> i32 {
    ffi_guard!({
        let buffer_arc = match ffi_lock!(BUFFERS).remove(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);
        GrowbufStatus::from(buffer.teardown()) as i32
    })
}

/// Number of populated elements.
///
/// Returns 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_len(buffer_handle: u64) -> usize {
    ffi_guard_or!(0, {
        get_buffer(buffer_handle)
            .and_then(|arc| arc.lock().ok().map(|b| b.len()))
            .unwrap_or(0)
    })
}

/// Number of allocated slots.
///
/// Returns 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_capacity(buffer_handle: u64) -> usize {
    ffi_guard_or!(0, {
        get_buffer(buffer_handle)
            .and_then(|arc| arc.lock().ok().map(|b| b.capacity()))
            .unwrap_or(0)
    })
}

/// Copy the element at `index` into `out` (`out_len` bytes available).
///
/// Returns `GROWBUF_STATUS_OUT_OF_BOUNDS` if `index >= capacity` and
/// `GROWBUF_STATUS_NOT_POPULATED` for an allocated but empty slot.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_at(
    buffer_handle: u64,
    index: usize,
    out: *mut u8,
    out_len: usize,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);

        let element = match buffer.at(index) {
            Ok(Some(element)) => element,
            Ok(None) => return GrowbufStatus::NotPopulated as i32,
            Err(e) => return GrowbufStatus::from(&e) as i32,
        };
        if out_len < element.len() {
            return GrowbufStatus::BufferTooSmall as i32;
        }
        // SAFETY: out is non-null with out_len >= element.len() writable bytes.
        unsafe { write_element(element, out) };
        GrowbufStatus::Ok as i32
    })
}

/// Append a copy of the `element_size` bytes at `data`, growing if full.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_append(buffer_handle: u64, data: *const u8) -> i32 {
    ffi_guard!({
        if data.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);

        // SAFETY: data points to element_size readable bytes per caller contract.
        let element = unsafe { std::slice::from_raw_parts(data, buffer.element_size()) };
        GrowbufStatus::from(buffer.append(element)) as i32
    })
}

/// Remove the last element and copy it into `out`. The caller takes
/// ownership: the destructor is not run.
///
/// Checks `out_len` before removing anything, so a too-small `out` leaves
/// the buffer unchanged.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_pop_back(buffer_handle: u64, out: *mut u8, out_len: usize) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);
        if out_len < buffer.element_size() {
            return GrowbufStatus::BufferTooSmall as i32;
        }

        let element = match buffer.pop_back() {
            Ok(element) => element.into_bytes(),
            Err(e) => return GrowbufStatus::from(&e) as i32,
        };
        // SAFETY: out is non-null with out_len >= element_size writable bytes.
        unsafe { write_element(&element, out) };
        GrowbufStatus::Ok as i32
    })
}

/// Insert a copy of the `element_size` bytes at `data` at `index`,
/// shifting later elements toward the tail. `index == len` appends.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_insert_at(buffer_handle: u64, data: *const u8, index: usize) -> i32 {
    ffi_guard!({
        if data.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);

        // SAFETY: data points to element_size readable bytes per caller contract.
        let element = unsafe { std::slice::from_raw_parts(data, buffer.element_size()) };
        GrowbufStatus::from(buffer.insert_at(element, index)) as i32
    })
}

/// Remove the element at `index` and copy it into `out`, shifting later
/// elements toward the head. The caller takes ownership: the destructor is
/// not run. Never shrinks.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_remove_at(
    buffer_handle: u64,
    index: usize,
    out: *mut u8,
    out_len: usize,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);
        if out_len < buffer.element_size() {
            return GrowbufStatus::BufferTooSmall as i32;
        }

        let element = match buffer.remove_at(index) {
            Ok(element) => element.into_bytes(),
            Err(e) => return GrowbufStatus::from(&e) as i32,
        };
        // SAFETY: out is non-null with out_len >= element_size writable bytes.
        unsafe { write_element(&element, out) };
        GrowbufStatus::Ok as i32
    })
}

/// Explicitly resize: `mode == 0` halves, `mode > 0` doubles, negative is
/// `GROWBUF_STATUS_INVALID_ARGUMENT`.
///
/// Shrinking destroys (via the destructor) every element past the new
/// capacity. `new_capacity_out` may be null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_resize(
    buffer_handle: u64,
    mode: i32,
    new_capacity_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let mode = match ResizeMode::try_from(mode) {
            Ok(m) => m,
            Err(e) => return GrowbufStatus::from(&e) as i32,
        };
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let mut buffer = ffi_lock!(buffer_arc);

        match buffer.resize(mode) {
            Ok(capacity) => {
                if !new_capacity_out.is_null() {
                    // SAFETY: new_capacity_out is valid per caller contract.
                    unsafe { *new_capacity_out = capacity };
                }
                GrowbufStatus::Ok as i32
            }
            Err(e) => GrowbufStatus::from(&e) as i32,
        }
    })
}

/// Write the buffer's metrics and current shape into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn growbuf_metrics(buffer_handle: u64, out: *mut GrowbufMetrics) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return GrowbufStatus::InvalidArgument as i32;
        }
        let buffer_arc = match get_buffer(buffer_handle) {
            Some(arc) => arc,
            None => return GrowbufStatus::InvalidHandle as i32,
        };
        let buffer = ffi_lock!(buffer_arc);
        let metrics = GrowbufMetrics::from_rust(buffer.metrics(), buffer.len(), buffer.capacity());
        // SAFETY: out is valid per caller contract.
        unsafe { *out = metrics };
        GrowbufStatus::Ok as i32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const OK: i32 = GrowbufStatus::Ok as i32;

    fn create_u32(value: u32, capacity: usize, destructor: Option<GrowbufDestructorFn>) -> u64 {
        let mut h = 0u64;
        let rc = growbuf_create(value.to_le_bytes().as_ptr(), 4, capacity, destructor, &mut h);
        assert_eq!(rc, OK);
        h
    }

    fn append_u32(h: u64, value: u32) -> i32 {
        growbuf_append(h, value.to_le_bytes().as_ptr())
    }

    fn at_u32(h: u64, index: usize) -> Result<u32, i32> {
        let mut out = [0u8; 4];
        match growbuf_at(h, index, out.as_mut_ptr(), out.len()) {
            OK => Ok(u32::from_le_bytes(out)),
            rc => Err(rc),
        }
    }

    fn pop_u32(h: u64) -> Result<u32, i32> {
        let mut out = [0u8; 4];
        match growbuf_pop_back(h, out.as_mut_ptr(), out.len()) {
            OK => Ok(u32::from_le_bytes(out)),
            rc => Err(rc),
        }
    }

    fn contents(h: u64) -> Vec<u32> {
        (0..growbuf_len(h)).map(|i| at_u32(h, i).unwrap()).collect()
    }

    #[test]
    fn append_grows_by_doubling() {
        let h = create_u32(5, 2, None);
        assert_eq!(growbuf_len(h), 1);
        assert_eq!(append_u32(h, 7), OK);
        assert_eq!((growbuf_len(h), growbuf_capacity(h)), (2, 2));
        assert_eq!(append_u32(h, 9), OK);
        assert_eq!((growbuf_len(h), growbuf_capacity(h)), (3, 4));
        assert_eq!(at_u32(h, 2), Ok(9));
        assert_eq!(growbuf_destroy(h), OK);
    }

    #[test]
    fn at_distinguishes_unpopulated_from_out_of_bounds() {
        let h = create_u32(1, 4, None);
        assert_eq!(at_u32(h, 3), Err(GrowbufStatus::NotPopulated as i32));
        assert_eq!(at_u32(h, 4), Err(GrowbufStatus::OutOfBounds as i32));
        growbuf_destroy(h);
    }

    #[test]
    fn insert_and_remove_shift_elements() {
        let h = create_u32(1, 4, None);
        for v in [2, 3, 4] {
            append_u32(h, v);
        }
        let mut out = [0u8; 4];
        assert_eq!(growbuf_remove_at(h, 1, out.as_mut_ptr(), 4), OK);
        assert_eq!(u32::from_le_bytes(out), 2);
        assert_eq!(contents(h), vec![1, 3, 4]);

        assert_eq!(growbuf_insert_at(h, 2u32.to_le_bytes().as_ptr(), 1), OK);
        assert_eq!(contents(h), vec![1, 2, 3, 4]);
        assert_eq!(
            growbuf_insert_at(h, 0u32.to_le_bytes().as_ptr(), 9),
            GrowbufStatus::OutOfBounds as i32
        );
        growbuf_destroy(h);
    }

    #[test]
    fn pop_back_halves_capacity() {
        let h = create_u32(1, 8, None);
        for v in [2, 3, 4] {
            append_u32(h, v);
        }
        let mut capacities = Vec::new();
        for expected in [4, 3, 2, 1] {
            assert_eq!(pop_u32(h), Ok(expected));
            capacities.push(growbuf_capacity(h));
        }
        assert_eq!(capacities, vec![4, 4, 2, 1]);
        assert_eq!(pop_u32(h), Err(GrowbufStatus::EmptyContainer as i32));
        growbuf_destroy(h);
    }

    #[test]
    fn too_small_output_leaves_buffer_unchanged() {
        let h = create_u32(1, 2, None);
        let mut out = [0u8; 2];
        assert_eq!(
            growbuf_pop_back(h, out.as_mut_ptr(), out.len()),
            GrowbufStatus::BufferTooSmall as i32
        );
        assert_eq!(
            growbuf_at(h, 0, out.as_mut_ptr(), out.len()),
            GrowbufStatus::BufferTooSmall as i32
        );
        assert_eq!(growbuf_len(h), 1);
        growbuf_destroy(h);
    }

    #[test]
    fn null_pointers_are_invalid_arguments() {
        let invalid = GrowbufStatus::InvalidArgument as i32;
        let mut h = 0u64;
        let one = 1u32.to_le_bytes();
        assert_eq!(growbuf_create(std::ptr::null(), 4, 2, None, &mut h), invalid);
        assert_eq!(
            growbuf_create(one.as_ptr(), 4, 2, None, std::ptr::null_mut()),
            invalid
        );
        assert_eq!(growbuf_create(one.as_ptr(), 0, 2, None, &mut h), invalid);

        let h = create_u32(1, 2, None);
        assert_eq!(growbuf_append(h, std::ptr::null()), invalid);
        assert_eq!(growbuf_insert_at(h, std::ptr::null(), 0), invalid);
        assert_eq!(growbuf_at(h, 0, std::ptr::null_mut(), 4), invalid);
        assert_eq!(growbuf_pop_back(h, std::ptr::null_mut(), 4), invalid);
        assert_eq!(growbuf_remove_at(h, 0, std::ptr::null_mut(), 4), invalid);
        assert_eq!(growbuf_metrics(h, std::ptr::null_mut()), invalid);
        growbuf_destroy(h);
    }

    #[test]
    fn zero_capacity_is_a_config_error() {
        let mut h = 0u64;
        let rc = growbuf_create(1u32.to_le_bytes().as_ptr(), 4, 0, None, &mut h);
        assert_eq!(rc, GrowbufStatus::ConfigError as i32);
    }

    #[test]
    fn destroyed_handle_rejects_everything() {
        let h = create_u32(1, 2, None);
        assert_eq!(growbuf_destroy(h), OK);

        let invalid = GrowbufStatus::InvalidHandle as i32;
        let mut out = [0u8; 4];
        let mut metrics = GrowbufMetrics::default();
        assert_eq!(growbuf_destroy(h), invalid);
        assert_eq!(growbuf_len(h), 0);
        assert_eq!(growbuf_capacity(h), 0);
        assert_eq!(append_u32(h, 2), invalid);
        assert_eq!(growbuf_at(h, 0, out.as_mut_ptr(), 4), invalid);
        assert_eq!(growbuf_pop_back(h, out.as_mut_ptr(), 4), invalid);
        assert_eq!(growbuf_insert_at(h, out.as_ptr(), 0), invalid);
        assert_eq!(growbuf_remove_at(h, 0, out.as_mut_ptr(), 4), invalid);
        assert_eq!(growbuf_resize(h, 1, std::ptr::null_mut()), invalid);
        assert_eq!(growbuf_metrics(h, &mut metrics), invalid);
    }

    #[test]
    fn destroy_runs_destructor_for_populated_elements_only() {
        static DESTROYED: AtomicUsize = AtomicUsize::new(0);
        #[allow(unsafe_code)]
        unsafe extern "C" fn count(_element: *mut u8, _len: usize) {
            DESTROYED.fetch_add(1, Ordering::SeqCst);
        }

        let h = create_u32(1, 8, Some(count));
        append_u32(h, 2);
        append_u32(h, 3);
        // Popped elements belong to the caller.
        assert_eq!(pop_u32(h), Ok(3));
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 0);

        assert_eq!(growbuf_destroy(h), OK);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn explicit_shrink_destroys_truncated_elements() {
        static DESTROYED: AtomicUsize = AtomicUsize::new(0);
        #[allow(unsafe_code)]
        unsafe extern "C" fn count(_element: *mut u8, _len: usize) {
            DESTROYED.fetch_add(1, Ordering::SeqCst);
        }

        let h = create_u32(1, 4, Some(count));
        for v in [2, 3, 4] {
            append_u32(h, v);
        }
        let mut capacity = 0usize;
        assert_eq!(growbuf_resize(h, 0, &mut capacity), OK);
        assert_eq!(capacity, 2);
        assert_eq!(contents(h), vec![1, 2]);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 2);

        assert_eq!(growbuf_resize(h, 3, &mut capacity), OK);
        assert_eq!(capacity, 4);
        assert_eq!(
            growbuf_resize(h, -1, &mut capacity),
            GrowbufStatus::InvalidArgument as i32
        );
        assert_eq!(capacity, 4);

        growbuf_destroy(h);
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn full_table_leaves_initial_element_with_caller() {
        static DESTROYED: AtomicUsize = AtomicUsize::new(0);
        #[allow(unsafe_code)]
        unsafe extern "C" fn count(_element: *mut u8, _len: usize) {
            DESTROYED.fetch_add(1, Ordering::SeqCst);
        }

        let mut table = HandleTable::with_slot_limit(1);
        let one = 1u32.to_le_bytes();
        register(&mut table, &one, BufferConfig::new(2), Arc::new(NoopDestructor)).unwrap();

        let two = 2u32.to_le_bytes();
        let result = register(
            &mut table,
            &two,
            BufferConfig::new(2),
            Arc::new(CDestructor(count)),
        );
        assert_eq!(result, Err(GrowbufStatus::InternalError));
        assert_eq!(DESTROYED.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn metrics_report_shape_and_events() {
        let h = create_u32(1, 1, None);
        append_u32(h, 2);
        append_u32(h, 3);
        let mut m = GrowbufMetrics::default();
        assert_eq!(growbuf_metrics(h, &mut m), OK);
        assert_eq!(m.len, 3);
        assert_eq!(m.capacity, 4);
        assert_eq!(m.grow_events, 2);
        assert_eq!(m.peak_capacity, 4);
        assert_eq!(m.memory_bytes, 16);
        growbuf_destroy(h);
    }

    #[test]
    fn ffi_guard_catches_panics() {
        let status = ffi_guard!({
            let empty: Vec<i32> = Vec::new();
            empty[0]
        });
        assert_eq!(status, GrowbufStatus::Panicked as i32);
        let value = ffi_guard_or!(7usize, {
            let empty: Vec<usize> = Vec::new();
            empty[0]
        });
        assert_eq!(value, 7);
    }
}
