//! Offset pagination for list queries.

use super::Error;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Validated one-based page request.
///
/// # Examples
/// ```
/// use shipment_backend::domain::PageRequest;
///
/// let page = PageRequest::new(3, 20).expect("valid page");
/// assert_eq!(page.offset(), 40);
/// assert_eq!(page.limit(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_no: i64,
    page_size: i64,
}

impl PageRequest {
    /// Validate page number and size.
    pub fn new(page_no: i64, page_size: i64) -> Result<Self, Error> {
        if page_no <= 0 {
            return Err(Error::invalid_request(
                "Page number must be greater than zero",
            ));
        }
        if page_size <= 0 {
            return Err(Error::invalid_request("Page size must be greater than zero"));
        }
        if page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_request(format!(
                "Page size must be at most {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page_no, page_size })
    }

    /// One-based page number.
    pub const fn page_no(&self) -> i64 {
        self.page_no
    }

    /// Rows to skip.
    pub const fn offset(&self) -> i64 {
        (self.page_no - 1).saturating_mul(self.page_size)
    }

    /// Rows to return.
    pub const fn limit(&self) -> i64 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, "Page number must be greater than zero")]
    #[case(-1, 10, "Page number must be greater than zero")]
    #[case(1, 0, "Page size must be greater than zero")]
    #[case(1, 101, "Page size must be at most 100")]
    fn rejects_out_of_range_values(#[case] page_no: i64, #[case] size: i64, #[case] message: &str) {
        let err = PageRequest::new(page_no, size).expect_err("invalid page");
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 100, 400)]
    fn computes_offsets(#[case] page_no: i64, #[case] size: i64, #[case] offset: i64) {
        let page = PageRequest::new(page_no, size).expect("valid page");
        assert_eq!(page.offset(), offset);
    }

    #[rstest]
    fn huge_page_numbers_saturate() {
        let page = PageRequest::new(i64::MAX, 100).expect("valid page");
        assert_eq!(page.offset(), i64::MAX);
    }
}
