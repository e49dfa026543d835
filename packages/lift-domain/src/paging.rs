//! Offset pagination shared by every list endpoint.

use lift_config::MAX_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagingError {
	InvalidPage(String),
	InvalidPageSize(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
	pub page: u32,
	pub page_size: u32,
}
impl PageWindow {
	/// Parses raw `page` / `pageSize` values. Missing values take the defaults, `page` is
	/// clamped to at least 1 and `pageSize` to `1..=max_page_size`, never above [`MAX_PAGE_SIZE`].
	pub fn resolve(
		page: Option<&str>,
		page_size: Option<&str>,
		default_page_size: u32,
		max_page_size: u32,
	) -> Result<Self, PagingError> {
		let page = match parse_int(page) {
			Ok(value) => value.unwrap_or(1),
			Err(raw) => return Err(PagingError::InvalidPage(raw)),
		};
		let page_size = match parse_int(page_size) {
			Ok(value) => value.unwrap_or(i64::from(default_page_size)),
			Err(raw) => return Err(PagingError::InvalidPageSize(raw)),
		};

		Ok(Self::clamped(page, page_size, max_page_size))
	}

	pub fn clamped(page: i64, page_size: i64, max_page_size: u32) -> Self {
		let max = i64::from(max_page_size.clamp(1, MAX_PAGE_SIZE));

		Self {
			page: page.clamp(1, i64::from(u32::MAX)) as u32,
			page_size: page_size.clamp(1, max) as u32,
		}
	}

	pub fn first(page_size: u32) -> Self {
		Self { page: 1, page_size: page_size.max(1) }
	}

	pub fn offset(&self) -> i64 {
		(i64::from(self.page) - 1) * i64::from(self.page_size)
	}

	pub fn limit(&self) -> i64 {
		i64::from(self.page_size)
	}
}

fn parse_int(raw: Option<&str>) -> Result<Option<i64>, String> {
	match raw.map(str::trim) {
		None | Some("") => Ok(None),
		Some(value) => value.parse::<i64>().map(Some).map_err(|_| value.to_string()),
	}
}
