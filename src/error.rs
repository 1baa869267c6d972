/// All errors that may occur during initialization or while handling requests.
#[derive(Debug, thiserror::Error)]
pub enum Error
{
	#[error("could not read configuration from the environment")]
	ReadEnvConfig(#[source] envy::Error),

	#[error("could not create HTTP client")]
	CreateHttpClient(#[source] reqwest::Error),

	#[error("missing payload form field")]
	MissingPayloadField,
	#[error("could not decode push payload")]
	DecodePushPayload(#[source] serde_json::Error),

	#[error("could not build comment URL")]
	BuildCommentUrl(#[source] url::ParseError),
	#[error("could not make Trello API request")]
	MakeTrelloApiRequest(#[source] reqwest::Error),
}
