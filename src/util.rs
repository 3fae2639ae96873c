/// Split off the first `N` bytes as an array
#[inline]
pub(crate) fn get_split<const N: usize>(data: &[u8]) -> Option<([u8; N], &[u8])> {
    data.split_first_chunk::<N>().map(|(head, rest)| (*head, rest))
}

#[inline]
pub(crate) fn read_u32(data: &[u8]) -> Option<(u32, &[u8])> {
    get_split::<4>(data).map(|(head, rest)| (u32::from_le_bytes(head), rest))
}
