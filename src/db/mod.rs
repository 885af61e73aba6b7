pub mod bookingdb;
pub mod db;
pub mod reviewdb;
pub mod roomdb;
pub mod userdb;

/// OFFSET arithmetic in i64 so oversized page numbers cannot overflow
/// the multiply before the bind.
pub(crate) fn page_offset(page: u32, limit: usize) -> i64 {
    i64::from(page.max(1) - 1) * limit as i64
}

#[cfg(test)]
mod tests {
    use super::page_offset;

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn page_offset_handles_oversized_pages() {
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(u32::MAX, 50), (i64::from(u32::MAX) - 1) * 50);
    }
}
