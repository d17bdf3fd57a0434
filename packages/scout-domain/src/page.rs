use std::ops::Range;

/// 1-based page request over a ranked result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub number: u32,
	pub size: u32,
}
impl Page {
	/// Half-open index range `[(number - 1) * size, (number - 1) * size + size)` clamped to
	/// `total`. Pages past the end yield an empty range.
	pub fn range(&self, total: usize) -> Range<usize> {
		let size = self.size as usize;
		let start = (self.number.max(1) as usize - 1).saturating_mul(size).min(total);
		let end = start.saturating_add(size).min(total);

		start..end
	}

	pub fn slice<T>(&self, ranked: Vec<T>) -> Vec<T> {
		let range = self.range(ranked.len());

		ranked.into_iter().skip(range.start).take(range.len()).collect()
	}
}
