//! Tests driving adapters through the raw dispatch table, the way native
//! callers do.
//!
//! These tests cover:
//! - Identity queries and their pointer contracts
//! - Read/Write/Seek semantics and status codes
//! - SetSize and Stat
//! - Fixed-result methods
//! - Fault containment

mod common;

use std::io::{self, Cursor};
use std::ptr::{self, NonNull};
use std::sync::Arc;

use comstream::domain::value_objects::{
    STATFLAG_DEFAULT, STATFLAG_NONAME, STGTY_STREAM, SUPPORTED_INTERFACES,
};
use comstream::{
    AccessMode, AdapterConfig, Guid, HResult, ManagedStream, RawStream, StatStg, StreamMethods,
    IID_ISTREAM,
};

use common::{init, vtbl, Inject, MockStream};

fn cursor(bytes: &[u8]) -> Arc<ManagedStream<Cursor<Vec<u8>>>> {
    ManagedStream::new(Cursor::new(bytes.to_vec()))
}

fn mock(stream: MockStream) -> Arc<ManagedStream<MockStream>> {
    ManagedStream::new(stream)
}

fn header<S: comstream::ByteStream>(stream: &ManagedStream<S>) -> NonNull<RawStream> {
    stream.as_raw().unwrap()
}

fn read(raw: NonNull<RawStream>, len: usize) -> (HResult, Vec<u8>) {
    let mut buf = vec![0u8; len];
    let mut count = u32::MAX;
    let status = unsafe {
        (vtbl(raw).read)(raw.as_ptr(), buf.as_mut_ptr().cast(), len as u32, &mut count)
    };
    buf.truncate(count as usize);
    (status, buf)
}

fn write(raw: NonNull<RawStream>, data: &[u8]) -> (HResult, u32) {
    let mut count = u32::MAX;
    let status = unsafe {
        (vtbl(raw).write)(raw.as_ptr(), data.as_ptr().cast(), data.len() as u32, &mut count)
    };
    (status, count)
}

fn seek(raw: NonNull<RawStream>, offset: i64, origin: u32) -> (HResult, u64) {
    let mut position = u64::MAX;
    let status = unsafe { (vtbl(raw).seek)(raw.as_ptr(), offset, origin, &mut position) };
    (status, position)
}

fn stat(raw: NonNull<RawStream>) -> Result<StatStg, HResult> {
    let mut record = StatStg::default();
    let status = unsafe { (vtbl(raw).stat)(raw.as_ptr(), &mut record, STATFLAG_DEFAULT) };
    if status == HResult::S_OK { Ok(record) } else { Err(status) }
}

// =============================================================================
// IDENTITY
// =============================================================================

#[test]
fn test_query_interface_returns_shared_pointer() {
    init();
    let stream = cursor(b"");
    let raw = header(&stream);

    for (i, iid) in SUPPORTED_INTERFACES.iter().enumerate() {
        let mut out: *mut core::ffi::c_void = ptr::null_mut();
        let status = unsafe { (vtbl(raw).query_interface)(raw.as_ptr(), iid, &mut out) };
        assert_eq!(status, HResult::S_OK, "{}", iid);
        assert_eq!(out, raw.as_ptr().cast());
        assert_eq!(stream.ref_count(), 2 + i as u32);
    }

    for _ in SUPPORTED_INTERFACES {
        stream.release().unwrap();
    }
    assert_eq!(stream.release(), Ok(0));
}

#[test]
fn test_query_interface_unknown_identity() {
    init();
    let stream = cursor(b"");
    let raw = header(&stream);
    let unknown = Guid::from_u128(0x00020400_0000_0000_c000_000000000046);

    let mut out = NonNull::<core::ffi::c_void>::dangling().as_ptr();
    let status = unsafe { (vtbl(raw).query_interface)(raw.as_ptr(), &unknown, &mut out) };
    assert_eq!(status, HResult::E_NOINTERFACE);
    assert!(out.is_null());
    assert_eq!(stream.ref_count(), 1);

    stream.release().unwrap();
}

#[test]
fn test_query_interface_null_pointers() {
    init();
    let stream = cursor(b"");
    let raw = header(&stream);

    let status =
        unsafe { (vtbl(raw).query_interface)(raw.as_ptr(), &IID_ISTREAM, ptr::null_mut()) };
    assert_eq!(status, HResult::E_POINTER);

    let mut out = NonNull::<core::ffi::c_void>::dangling().as_ptr();
    let status = unsafe { (vtbl(raw).query_interface)(raw.as_ptr(), ptr::null(), &mut out) };
    assert_eq!(status, HResult::E_POINTER);
    assert!(!out.is_null());

    assert_eq!(stream.ref_count(), 1);
    stream.release().unwrap();
}

#[test]
fn test_add_ref_release_through_table() {
    init();
    let stream = cursor(b"");
    let raw = header(&stream);

    unsafe {
        assert_eq!((vtbl(raw).add_ref)(raw.as_ptr()), 2);
        assert_eq!((vtbl(raw).add_ref)(raw.as_ptr()), 3);
        assert_eq!((vtbl(raw).release)(raw.as_ptr()), 2);
        assert_eq!((vtbl(raw).release)(raw.as_ptr()), 1);
        assert_eq!((vtbl(raw).release)(raw.as_ptr()), 0);
    }
    assert!(stream.is_disposed());
}

// =============================================================================
// READ / WRITE / SEEK
// =============================================================================

#[test]
fn test_read_full_and_short() {
    init();
    let stream = cursor(b"hello world");
    let raw = header(&stream);

    assert_eq!(read(raw, 5), (HResult::S_OK, b"hello".to_vec()));
    assert_eq!(read(raw, 10), (HResult::S_FALSE, b" world".to_vec()));
    assert_eq!(read(raw, 4), (HResult::S_FALSE, Vec::new()));

    stream.release().unwrap();
}

#[test]
fn test_read_without_count_slot() {
    init();
    let stream = cursor(b"abc");
    let raw = header(&stream);

    let mut buf = [0u8; 3];
    let status =
        unsafe { (vtbl(raw).read)(raw.as_ptr(), buf.as_mut_ptr().cast(), 3, ptr::null_mut()) };
    assert_eq!(status, HResult::S_OK);
    assert_eq!(&buf, b"abc");

    stream.release().unwrap();
}

#[test]
fn test_read_null_buffer() {
    init();
    let stream = cursor(b"abc");
    let raw = header(&stream);

    let mut count = 7u32;
    let status = unsafe { (vtbl(raw).read)(raw.as_ptr(), ptr::null_mut(), 4, &mut count) };
    assert_eq!(status, HResult::STG_E_INVALIDPOINTER);
    assert_eq!(count, 0);

    let status = unsafe { (vtbl(raw).read)(raw.as_ptr(), ptr::null_mut(), 0, &mut count) };
    assert_eq!(status, HResult::S_OK);
    assert_eq!(count, 0);

    stream.release().unwrap();
}

#[test]
fn test_read_accumulates_partial_backing_reads() {
    init();
    let stream = mock(MockStream {
        read_limit: Some(2),
        interrupts: 3,
        ..MockStream::with_data(b"0123456789")
    });
    let raw = header(&stream);

    assert_eq!(read(raw, 7), (HResult::S_OK, b"0123456".to_vec()));
    stream.release().unwrap();
}

#[test]
fn test_read_failure_status() {
    init();
    let carried = mock(MockStream {
        read_error: Some(Inject::Status(HResult::STG_E_REVERTED)),
        ..MockStream::with_data(b"abc")
    });
    assert_eq!(read(header(&carried), 3), (HResult::STG_E_REVERTED, Vec::new()));
    carried.release().unwrap();

    let plain = mock(MockStream {
        read_error: Some(Inject::Kind(io::ErrorKind::BrokenPipe)),
        ..MockStream::with_data(b"abc")
    });
    assert_eq!(read(header(&plain), 3), (HResult::E_FAIL, Vec::new()));
    plain.release().unwrap();
}

#[test]
fn test_write_then_read_back() {
    init();
    let stream = cursor(b"");
    let raw = header(&stream);

    assert_eq!(write(raw, b"native bytes"), (HResult::S_OK, 12));
    assert_eq!(seek(raw, 0, 0), (HResult::S_OK, 0));
    assert_eq!(read(raw, 12), (HResult::S_OK, b"native bytes".to_vec()));

    stream.release().unwrap();
}

#[test]
fn test_write_storage_full() {
    init();
    let stream = mock(MockStream {
        capacity: Some(4),
        ..MockStream::default()
    });
    let raw = header(&stream);

    assert_eq!(write(raw, b"0123456789"), (HResult::STG_E_MEDIUMFULL, 4));
    assert_eq!(stream.with_stream(|s| s.data.clone()), b"0123");

    stream.release().unwrap();
}

#[test]
fn test_write_failures() {
    init();
    let failing = mock(MockStream {
        write_error: Some(Inject::Kind(io::ErrorKind::PermissionDenied)),
        ..MockStream::default()
    });
    assert_eq!(write(header(&failing), b"x"), (HResult::STG_E_CANTSAVE, 0));
    failing.release().unwrap();

    let stuck = mock(MockStream {
        accept_nothing: true,
        ..MockStream::default()
    });
    assert_eq!(write(header(&stuck), b"x"), (HResult::STG_E_MEDIUMFULL, 0));
    stuck.release().unwrap();
}

#[test]
fn test_write_disk_full_statuses() {
    init();
    for status in [HResult::E_DISK_FULL, HResult::E_HANDLE_DISK_FULL] {
        let stream = mock(MockStream {
            write_error: Some(Inject::Status(status)),
            ..MockStream::default()
        });
        assert_eq!(write(header(&stream), b"x"), (HResult::STG_E_MEDIUMFULL, 0));
        stream.release().unwrap();
    }
}

#[test]
fn test_write_respects_chunk_cap() {
    init();
    let config = AdapterConfig::new(3, 2).unwrap();
    let stream = ManagedStream::with_config(MockStream::default(), config);
    let raw = header(&stream);

    assert_eq!(write(raw, b"abcdefghij"), (HResult::S_OK, 10));
    stream.with_stream(|s| {
        assert_eq!(s.largest_write, 3);
        assert_eq!(s.data, b"abcdefghij");
    });

    stream.release().unwrap();
}

#[test]
fn test_seek_origins() {
    init();
    let stream = cursor(b"0123456789");
    let raw = header(&stream);

    assert_eq!(seek(raw, 3, 0), (HResult::S_OK, 3));
    assert_eq!(seek(raw, 2, 1), (HResult::S_OK, 5));
    assert_eq!(seek(raw, -1, 2), (HResult::S_OK, 9));
    assert_eq!(read(raw, 1), (HResult::S_OK, b"9".to_vec()));

    let status = unsafe { (vtbl(raw).seek)(raw.as_ptr(), 0, 0, ptr::null_mut()) };
    assert_eq!(status, HResult::S_OK);

    stream.release().unwrap();
}

#[test]
fn test_seek_rejections() {
    init();
    let stream = cursor(b"0123456789");
    let raw = header(&stream);
    seek(raw, 4, 0);

    assert_eq!(seek(raw, 0, 3).0, HResult::STG_E_INVALIDFUNCTION);
    assert_eq!(seek(raw, -1, 0).0, HResult::STG_E_INVALIDFUNCTION);
    assert_eq!(seek(raw, -5, 1).0, HResult::STG_E_INVALIDFUNCTION);
    assert_eq!(seek(raw, -11, 2).0, HResult::STG_E_INVALIDFUNCTION);
    assert_eq!(seek(raw, 0, 1), (HResult::S_OK, 4));

    stream.release().unwrap();
}

// =============================================================================
// SET SIZE / STAT
// =============================================================================

#[test]
fn test_set_size_then_stat() {
    init();
    let stream = cursor(b"abc");
    let raw = header(&stream);

    unsafe {
        assert_eq!((vtbl(raw).set_size)(raw.as_ptr(), 100), HResult::S_OK);
    }
    let record = stat(raw).unwrap();
    assert_eq!(record.kind, STGTY_STREAM);
    assert_eq!(record.size, 100);
    assert_eq!(record.access_mode(), Some(AccessMode::ReadWrite));

    unsafe {
        assert_eq!((vtbl(raw).set_size)(raw.as_ptr(), 2), HResult::S_OK);
        assert_eq!((vtbl(raw).set_size)(raw.as_ptr(), u64::MAX), HResult::STG_E_INVALIDFUNCTION);
    }
    assert_eq!(stat(raw).unwrap().size, 2);

    stream.release().unwrap();
}

#[test]
fn test_set_size_failures() {
    init();
    let full = mock(MockStream {
        capacity: Some(8),
        ..MockStream::default()
    });
    let raw_full = header(&full);
    unsafe {
        assert_eq!((vtbl(raw_full).set_size)(raw_full.as_ptr(), 8), HResult::S_OK);
        assert_eq!((vtbl(raw_full).set_size)(raw_full.as_ptr(), 9), HResult::STG_E_MEDIUMFULL);
    }
    full.release().unwrap();

    let broken = mock(MockStream {
        resize_error: Some(Inject::Kind(io::ErrorKind::PermissionDenied)),
        ..MockStream::default()
    });
    let raw_broken = header(&broken);
    unsafe {
        assert_eq!(
            (vtbl(raw_broken).set_size)(raw_broken.as_ptr(), 1),
            HResult::STG_E_INVALIDFUNCTION
        );
    }
    broken.release().unwrap();

    for status in [HResult::E_DISK_FULL, HResult::E_HANDLE_DISK_FULL] {
        let disk_full = mock(MockStream {
            resize_error: Some(Inject::Status(status)),
            ..MockStream::default()
        });
        let raw = header(&disk_full);
        unsafe {
            assert_eq!((vtbl(raw).set_size)(raw.as_ptr(), 1), HResult::STG_E_MEDIUMFULL);
        }
        disk_full.release().unwrap();
    }
}

#[test]
fn test_stat_modes() {
    init();
    let read_only = mock(MockStream {
        unwritable: true,
        ..MockStream::with_data(b"ro")
    });
    let record = stat(header(&read_only)).unwrap();
    assert_eq!(record.access_mode(), Some(AccessMode::Read));
    assert_eq!(record.size, 2);
    read_only.release().unwrap();

    let write_only = mock(MockStream {
        unreadable: true,
        ..MockStream::default()
    });
    assert_eq!(
        stat(header(&write_only)).unwrap().access_mode(),
        Some(AccessMode::Write)
    );
    write_only.release().unwrap();

    let closed = mock(MockStream {
        unreadable: true,
        unwritable: true,
        ..MockStream::default()
    });
    assert_eq!(stat(header(&closed)).unwrap_err(), HResult::STG_E_REVERTED);
    closed.release().unwrap();
}

#[test]
fn test_stat_length_failure() {
    init();
    let stream = mock(MockStream {
        length_error: Some(Inject::Kind(io::ErrorKind::Other)),
        ..MockStream::default()
    });
    assert_eq!(stat(header(&stream)).unwrap_err(), HResult::E_FAIL);
    stream.release().unwrap();
}

#[test]
fn test_stat_overwrites_record() {
    init();
    let stream = cursor(b"12345");
    let raw = header(&stream);

    let mut record = StatStg::default();
    record.name = NonNull::<u16>::dangling().as_ptr();
    record.grf_state_bits = 0xdead;
    let status = unsafe { (vtbl(raw).stat)(raw.as_ptr(), &mut record, STATFLAG_NONAME) };
    assert_eq!(status, HResult::S_OK);
    assert!(record.name.is_null());
    assert_eq!(record.grf_state_bits, 0);
    assert_eq!(record.size, 5);

    let status = unsafe { (vtbl(raw).stat)(raw.as_ptr(), ptr::null_mut(), STATFLAG_DEFAULT) };
    assert_eq!(status, HResult::STG_E_INVALIDPOINTER);

    stream.release().unwrap();
}

// =============================================================================
// FIXED RESULTS
// =============================================================================

#[test]
fn test_fixed_result_methods() {
    init();
    let stream = cursor(b"");
    let raw = header(&stream);
    let table = vtbl(raw);

    unsafe {
        assert_eq!((table.commit)(raw.as_ptr(), 0), HResult::S_OK);
        assert_eq!((table.revert)(raw.as_ptr()), HResult::S_OK);
        assert_eq!((table.lock_region)(raw.as_ptr(), 0, 10, 1), HResult::STG_E_INVALIDFUNCTION);
        assert_eq!((table.unlock_region)(raw.as_ptr(), 0, 10, 1), HResult::STG_E_INVALIDFUNCTION);

        let mut out = NonNull::<RawStream>::dangling().as_ptr();
        assert_eq!((table.clone)(raw.as_ptr(), &mut out), HResult::E_NOTIMPL);
        assert!(out.is_null());
        assert_eq!((table.clone)(raw.as_ptr(), ptr::null_mut()), HResult::E_NOTIMPL);
    }

    stream.release().unwrap();
}

// =============================================================================
// FAULT CONTAINMENT
// =============================================================================

#[test]
fn test_panic_becomes_e_fail() {
    init();
    let stream = mock(MockStream {
        panic_on_read: true,
        ..MockStream::with_data(b"boom")
    });
    let raw = header(&stream);

    let mut buf = [0u8; 4];
    let mut count = 0xDEAD_BEEF_u32;
    let status = unsafe { (vtbl(raw).read)(raw.as_ptr(), buf.as_mut_ptr().cast(), 4, &mut count) };
    assert_eq!((status, count), (HResult::E_FAIL, 0));

    let target = cursor(b"");
    let mut copied_in = 0xAAAA_u64;
    let mut copied_out = 0xBBBB_u64;
    let status = unsafe {
        (vtbl(raw).copy_to)(raw.as_ptr(), header(&target).as_ptr(), 4, &mut copied_in, &mut copied_out)
    };
    assert_eq!((status, copied_in, copied_out), (HResult::E_FAIL, 0, 0));
    target.release().unwrap();

    // The instance is still usable afterwards.
    assert_eq!(stat(raw).unwrap().size, 4);
    assert_eq!(write(raw, b"ok"), (HResult::S_OK, 2));

    stream.release().unwrap();
}

#[test]
fn test_null_this_is_contained() {
    init();
    let stream = cursor(b"");
    let table = vtbl(header(&stream));

    unsafe {
        assert_eq!((table.add_ref)(ptr::null_mut()), 0);
        assert_eq!((table.commit)(ptr::null_mut(), 0), HResult::E_FAIL);

        let mut written = u32::MAX;
        let status = (table.write)(ptr::null_mut(), b"x".as_ptr().cast(), 1, &mut written);
        assert_eq!((status, written), (HResult::E_FAIL, 0));
    }
    assert_eq!(stream.ref_count(), 1);
    stream.release().unwrap();
}
