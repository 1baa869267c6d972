/// Process-wide configuration, read from the environment exactly once at startup and immutable
/// afterwards. Handed by value to the components that need it, so there is no implicit global
/// lookup anywhere else in the crate.
#[derive(Debug, serde::Deserialize)]
pub struct Config
{
	/// The TCP port the webhook server listens on.
	pub port: u16,
	/// The API key identifying this integration to Trello (optional; an empty key is sent as-is
	/// and left for Trello to reject).
	#[serde(default)]
	pub trello_api_key: String,
	/// The API token authorizing comment creation (optional, same policy as the key).
	#[serde(default)]
	pub trello_token: String,
	/// The base URL of the Trello REST API with a trailing slash (optional, default:
	/// <https://api.trello.com/1/>).
	#[serde(default = "trello_com_api_base_url")]
	pub trello_base_url: url::Url,
}

#[doc(hidden)]
fn trello_com_api_base_url() -> url::Url
{
	url::Url::parse("https://api.trello.com/1/")
		.expect("this call is infallible because we know the URL to be well-formed")
}

impl Config
{
	/// Attempt to read and parse the configuration from the process environment.
	///
	/// Variable names match the field names in upper case (`PORT`, `TRELLO_API_KEY`,
	/// `TRELLO_TOKEN`, `TRELLO_BASE_URL`). The key and token are deliberately not validated;
	/// empty values are accepted and used as-is.
	pub fn from_env() -> Result<Self, crate::Error>
	{
		envy::from_env().map_err(crate::Error::ReadEnvConfig)
	}
}
