/// A memory address as it appears in a trace
pub type Address = u64;

/// Splits an address into `(tag, set)`.
///
/// The set index is the `set_bits` bits directly above the block offset, and the tag is everything
/// above those. Shifts are logical, so the full 64 bit range is preserved.
///
/// Shifting by 64 or more yields 0 rather than overflowing, which only matters for parameters that
/// leave no tag bits at all
///
/// # Arguments
///
/// * `address`: The address of the access
/// * `set_bits`: The number of set index bits (s)
/// * `block_bits`: The number of block offset bits (b)
///
/// returns: (u64, u64)
///
/// # Examples
///
/// ```
/// use csimlib::address::decode;
/// // 0x20 with b = 1 lands in set (0x20 >> 1) % 2 = 0, tag 0x20 >> 2 = 8
/// assert_eq!(decode(0x20, 1, 1), (0x8, 0));
/// assert_eq!(decode(0x7ff000418, 4, 4), (0x7ff0004, 0x1));
/// ```
pub fn decode(address: Address, set_bits: u32, block_bits: u32) -> (u64, u64) {
    let set_mask = match 1u64.checked_shl(set_bits) {
        Some(sets) => sets - 1,
        None => u64::MAX,
    };
    let set = address.checked_shr(block_bits).unwrap_or(0) & set_mask;
    let tag = address.checked_shr(set_bits + block_bits).unwrap_or(0);
    (tag, set)
}

/// Rebuilds the block-aligned address for a tag and set, the inverse of [`decode`] with the block
/// offset bits zeroed
///
/// # Examples
///
/// ```
/// use csimlib::address::{decode, block_address};
/// let (tag, set) = decode(0x1234_5678, 5, 6);
/// assert_eq!(block_address(tag, set, 5, 6), 0x1234_5678 & !0x3f);
/// ```
pub fn block_address(tag: u64, set: u64, set_bits: u32, block_bits: u32) -> Address {
    let tag_part = tag.checked_shl(set_bits + block_bits).unwrap_or(0);
    let set_part = set.checked_shl(block_bits).unwrap_or(0);
    tag_part | set_part
}
