//! Interface identifier value object and the recognised identity set.

use core::fmt;

/// A 128-bit interface identifier in native `GUID` layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Guid {
    /// First 32 bits.
    pub data1: u32,
    /// Next 16 bits.
    pub data2: u16,
    /// Next 16 bits.
    pub data3: u16,
    /// Final 64 bits, stored byte-wise.
    pub data4: [u8; 8],
}

impl Guid {
    /// The all-zero identifier.
    pub const ZERO: Self = Self::from_u128(0);

    /// Build a GUID from its canonical big-endian 128-bit form.
    ///
    /// ```
    /// use comstream::Guid;
    ///
    /// let iid = Guid::from_u128(0x0000000c_0000_0000_c000_000000000046);
    /// assert_eq!(iid.data1, 0x0000000c);
    /// assert_eq!(iid.data4[0], 0xc0);
    /// ```
    pub const fn from_u128(value: u128) -> Self {
        Self {
            data1: (value >> 96) as u32,
            data2: (value >> 80) as u16,
            data3: (value >> 64) as u16,
            data4: (value as u64).to_be_bytes(),
        }
    }

    /// Canonical 128-bit form.
    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | (u64::from_be_bytes(self.data4) as u128)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

/// `IUnknown`, the base object interface.
pub const IID_IUNKNOWN: Guid = Guid::from_u128(0x00000000_0000_0000_c000_000000000046);

/// `ISequentialStream`, the read/write-only stream interface.
pub const IID_ISEQUENTIAL_STREAM: Guid = Guid::from_u128(0x0c733a30_2a1c_11ce_ade5_00aa0044773d);

/// `IStream`, the full seekable stream interface.
pub const IID_ISTREAM: Guid = Guid::from_u128(0x0000000c_0000_0000_c000_000000000046);

/// Identifier answered only by streams produced by this crate.
///
/// Native code holding an arbitrary stream can query for it to detect that the
/// object is a `ManagedStream` without any other side channel.
pub const MANAGED_STREAM_IID: Guid = Guid::from_u128(0x3b7e51d2_9c4a_4f06_8e21_d5a0c6f4b819);

/// Every identifier a `ManagedStream` answers to. All of them yield the same
/// object pointer.
pub const SUPPORTED_INTERFACES: [Guid; 4] = [
    IID_IUNKNOWN,
    IID_ISEQUENTIAL_STREAM,
    IID_ISTREAM,
    MANAGED_STREAM_IID,
];

/// Whether `iid` is one of [`SUPPORTED_INTERFACES`].
pub fn is_supported_interface(iid: &Guid) -> bool {
    SUPPORTED_INTERFACES.contains(iid)
}
