#[doc(hidden)]
mod config;
#[doc(hidden)]
mod error;
#[doc(hidden)]
mod models;
pub mod notifier;
pub mod trello_api;

pub use config::Config;
pub use error::Error;
pub use models::*;

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	dotenv::dotenv().ok();
	pretty_env_logger::init();

	// Read the configuration from the environment, once; it stays immutable afterwards
	let config = Config::from_env()?;

	// Initialize the Trello API client and the notifier posting card comments through it
	let trello_api_client = trello_api::Client::from_config(&config)?;
	let notifier = notifier::Notifier::new(trello_api_client);

	let routes = routes(notifier, STATIC_ROOT);

	log::info!("listening for incoming push webhooks on 0.0.0.0:{}", config.port);
	warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

	Ok(())
}

/// The fixed local directory all non-webhook paths are served from.
const STATIC_ROOT: &str = "./public";

/// All routes of the webhook server: the push payload endpoint plus the static file fallback.
///
/// # Arguments
/// - `notifier`: The notifier handed one decoded commit batch per inbound request.
/// - `static_root`: The directory files are served from for every path other than `/payload`.
fn routes(notifier: notifier::Notifier, static_root: impl Into<std::path::PathBuf>)
	-> impl warp::Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone
{
	use warp::Filter as _;

	let push_event_route =
		// Only listen for requests to the payload path
		warp::path("payload")
		.and(warp::path::end())
		// Only listen for POST requests
		.and(warp::post())
		// Reject payloads larger than 256 kB, which should be enough for all valid requests
		.and(warp::body::content_length_limit(256 * 1024))
		// Relay the raw form-encoded body; the payload field is extracted by the handler itself
		// so that a malformed body can never fail the request
		.and(warp::body::bytes())
		// Relay a handle to the notifier
		.and(warp::any().map(move || notifier.clone()))
		// Forward request to request handler
		.and_then(handle_push_event);

	// Every other path and method falls through to a plain file server
	let static_files_route = warp::fs::dir(static_root.into());

	push_event_route
		.or(static_files_route)
		.recover(handle_rejection)
}

/// Request handler for the push payload endpoint.
///
/// Decodes the commit batch from the `payload` form field and, if it contains at least one
/// commit, spawns a detached task to notify the referenced cards. The response is `200 OK` with
/// an empty body in all cases (the webhook sender must never see an error from this service, no
/// matter how malformed the payload is) and is returned without waiting for the notification
/// work or observing its outcome.
///
/// # Arguments
/// - `body`: The raw form-encoded request body.
/// - `notifier`: A handle to the card notifier.
async fn handle_push_event(body: warp::hyper::body::Bytes, notifier: notifier::Notifier)
	-> Result<impl warp::Reply, std::convert::Infallible>
{
	let push = match decode_push_payload(&body)
	{
		Ok(push) => push,
		Err(error) =>
		{
			// The always-succeed contract toward the sender turns a decode failure into an
			// empty batch rather than an error response
			log::warn!("treating undecodable payload as an empty commit batch");
			log::warn!("{:?}", anyhow::Error::from(error));
			PushEvent::default()
		},
	};

	// Dump the decoded batch regardless of outcome
	log::debug!("decoded push event: {push:?}");

	if !push.commits.is_empty()
	{
		// Notify the referenced cards in a separate task so as to acknowledge the webhook
		// immediately without blocking. The task is never joined, cancelled, or timed out, and
		// its outcome is only ever logged
		tokio::spawn(
			async move
			{
				notifier.notify_push(push).await;
			});
	}

	Ok(warp::reply())
}

/// Decode the commit batch from a form-encoded request body.
///
/// The body must contain a `payload` field whose value is a JSON document in the [PushEvent]
/// shape. Fields absent from the document decode to empty/zero values; only a missing field or
/// invalid JSON is an error, and the caller decides what to make of it.
fn decode_push_payload(body: &[u8]) -> Result<PushEvent, Error>
{
	let payload = url::form_urlencoded::parse(body)
		.find(|(name, _)| name == "payload")
		.map(|(_, value)| value.into_owned())
		.ok_or(Error::MissingPayloadField)?;

	serde_json::from_str(&payload).map_err(Error::DecodePushPayload)
}

/// Request handler for all requests that were rejected previously.
///
/// # Arguments
/// - `error`: Reasons for why this request was rejected by all routes.
async fn handle_rejection(error: warp::Rejection)
	-> Result<impl warp::Reply, std::convert::Infallible>
{
	let status_code;
	let message;

	if error.is_not_found()
	{
		status_code = warp::http::StatusCode::NOT_FOUND;
		message = "not found";
	}
	// A method mismatch means the request missed the payload route and the file server could
	// not serve it either; these read as a missing file, not as 405
	else if let Some(_) = error.find::<warp::reject::MethodNotAllowed>()
	{
		status_code = warp::http::StatusCode::NOT_FOUND;
		message = "not found";
	}
	else if let Some(_) = error.find::<warp::reject::PayloadTooLarge>()
	{
		status_code = warp::http::StatusCode::BAD_REQUEST;
		message = "payload too large";
	}
	// If users are able to trigger errors we did not anticipate, log the error chain so we can
	// inspect this more closely later
	else
	{
		status_code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
		message = "internal server error";

		log::error!("unhandled error: {:#?}", error);
	}

	let response = warp::reply::json(&ErrorResponse{error: message});

	Ok(warp::reply::with_status(response, status_code))
}

/// Response type informing about errors while handling requests (serialized to JSON).
#[derive(serde::Serialize)]
struct ErrorResponse<'a>
{
	/// Error message with a human-readable explanation as to why this request failed.
	error: &'a str,
}
