/// A minimal client for the Trello REST API, covering the single endpoint this service needs:
/// creating a comment on a card.
///
/// Authentication is the plain key/token scheme, carried in the query string of every request as
/// Trello expects. Neither value is validated up front; if they are empty or wrong, Trello
/// rejects the request, the rejection is logged by the caller, and nothing else happens.
///
/// The client can safely be shared between tasks; the underlying [reqwest::Client] already uses a
/// thread-safe handle internally.
#[derive(Debug, Clone)]
pub struct Client
{
	#[doc(hidden)]
	base_url: url::Url,
	#[doc(hidden)]
	api_key: String,
	#[doc(hidden)]
	token: String,
	#[doc(hidden)]
	reqwest_client: reqwest::Client,
}

impl Client
{
	/// Initialize a new Trello API client from the process configuration.
	pub fn from_config(config: &crate::Config) -> Result<Self, crate::Error>
	{
		// Set a recognizable user agent to get meaningful debugging information from Trello. No
		// request timeout is configured: a hanging call stalls only the one detached batch task
		// it runs in, never the server
		let reqwest_client = reqwest::ClientBuilder::new()
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build().map_err(crate::Error::CreateHttpClient)?;

		Ok(Self
		{
			base_url: config.trello_base_url.clone(),
			api_key: config.trello_api_key.clone(),
			token: config.trello_token.clone(),
			reqwest_client,
		})
	}

	/// Post a comment to a card.
	///
	/// The request carries all parameters (the comment text and the credentials) in the query
	/// string and an empty body, matching `POST /1/cards/{id}/actions/comments`. The response
	/// status is returned for the caller to log but is otherwise not acted upon; there are no
	/// retries.
	///
	/// # Arguments
	/// - `card_id`: The ID of the card to comment on, as matched in a commit message.
	/// - `text`: The comment text, interpolated verbatim into the query string.
	pub async fn comment_on_card(&self, card_id: &str, text: &str)
		-> Result<reqwest::StatusCode, crate::Error>
	{
		let url = self.comment_url(card_id, text)?;

		log::debug!("POST {url}");

		let response = self.reqwest_client
			.post(url)
			.send().await.map_err(crate::Error::MakeTrelloApiRequest)?;

		Ok(response.status())
	}

	/// Build the full comment-creation URL for a card, with the text and credentials encoded as
	/// query parameters.
	#[doc(hidden)]
	fn comment_url(&self, card_id: &str, text: &str) -> Result<url::Url, crate::Error>
	{
		let mut url = self.base_url
			.join(&format!("cards/{card_id}/actions/comments"))
			.map_err(crate::Error::BuildCommentUrl)?;

		url.query_pairs_mut()
			.append_pair("text", text)
			.append_pair("key", &self.api_key)
			.append_pair("token", &self.token);

		Ok(url)
	}
}
