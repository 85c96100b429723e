//! Sort-mode parsing and page/limit clamping for inbound requests.
//! Bad values are corrected, never rejected.

pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
	#[default]
	Relevance,
	Name,
	ExternalId,
	Popularity,
}

impl SortMode {
	/// Unknown values fall back to relevance.
	pub fn parse(raw: &str) -> Self {
		match raw.trim() {
			"name" => Self::Name,
			"external_id" | "externalId" => Self::ExternalId,
			"popularity" => Self::Popularity,
			_ => Self::Relevance,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Relevance => "relevance",
			Self::Name => "name",
			Self::ExternalId => "external_id",
			Self::Popularity => "popularity",
		}
	}
}

pub fn clamp_page(raw: Option<u32>) -> u32 {
	raw.unwrap_or(1).max(1)
}

pub fn clamp_limit(raw: Option<u32>, default_limit: u32) -> u32 {
	raw.unwrap_or(default_limit).clamp(1, MAX_LIMIT)
}
