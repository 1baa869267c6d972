/// Scans commit messages for card references and notifies Trello about each one.
///
/// A card reference is any run of word characters immediately preceded by a literal `#`, for
/// example `#12` or `#refactor_parser`. References are processed in the order they are found:
/// commits in payload order, matches within one message from left to right. Duplicate references
/// (within one message or across commits) are each notified independently; there is no
/// deduplication.
#[derive(Debug, Clone)]
pub struct Notifier
{
	#[doc(hidden)]
	client: crate::trello_api::Client,
	#[doc(hidden)]
	card_reference: regex::Regex,
}

impl Notifier
{
	/// Initialize a new notifier posting comments through the given Trello API client.
	pub fn new(client: crate::trello_api::Client) -> Self
	{
		let card_reference = regex::Regex::new(r"#(\w+)")
			.expect("this call is infallible because we know the pattern to be well-formed");

		Self{client, card_reference}
	}

	/// Process one commit batch: post one card comment per reference found in any commit message.
	///
	/// Comments are posted sequentially within the batch. The outcome of each call, whether a
	/// response status or a transport error, is logged and otherwise discarded; a failed comment
	/// never aborts the rest of the batch.
	pub async fn notify_push(&self, push: crate::PushEvent)
	{
		for commit in &push.commits
		{
			for card_id in self.card_references(&commit.message)
			{
				let text = comment_text(commit);

				log::debug!("found reference to card “{card_id}” in commit {}", commit.id);

				match self.client.comment_on_card(card_id, &text).await
				{
					Ok(status) =>
						log::info!("commented on card “{card_id}” for commit {} ({status})",
							commit.id),
					Err(error) =>
					{
						log::error!("could not comment on card “{card_id}” for commit {}",
							commit.id);
						log::error!("{:?}", anyhow::Error::from(error));
					},
				}
			}
		}
	}

	/// All card IDs referenced in a commit message, in left-to-right order.
	#[doc(hidden)]
	fn card_references<'a>(&self, message: &'a str) -> Vec<&'a str>
	{
		self.card_reference.captures_iter(message)
			.map(|captures| captures.extract::<1>().1[0])
			.collect()
	}
}

/// The comment text for a commit, in the fixed shape
/// `<committer name> push the commit '<message>'[<id>](<url>)`.
///
/// No escaping or truncation is applied to any of the interpolated values.
#[doc(hidden)]
fn comment_text(commit: &crate::Commit) -> String
{
	format!("{} push the commit '{}'[{}]({})",
		commit.committer.name, commit.message, commit.id, commit.url)
}

#[cfg(test)]
mod tests
{
	use super::*;

	fn test_notifier() -> Notifier
	{
		let config = crate::Config
		{
			port: 0,
			trello_api_key: String::new(),
			trello_token: String::new(),
			trello_base_url: url::Url::parse("https://api.trello.com/1/").unwrap(),
		};

		Notifier::new(crate::trello_api::Client::from_config(&config).unwrap())
	}

	/// A notifier posting through a given base URL, with fixed non-empty credentials.
	fn test_notifier_with(base_url: url::Url) -> Notifier
	{
		let config = crate::Config
		{
			port: 0,
			trello_api_key: "key123".to_string(),
			trello_token: "token456".to_string(),
			trello_base_url: base_url,
		};

		Notifier::new(crate::trello_api::Client::from_config(&config).unwrap())
	}

	type RecordedRequests =
		std::sync::Arc<std::sync::Mutex<Vec<(warp::http::Method, String, String)>>>;

	/// Spawn a local server standing in for the Trello API on an ephemeral port, recording the
	/// method, path, and raw query string of every request it receives.
	fn spawn_capture_server() -> (url::Url, RecordedRequests)
	{
		use warp::Filter as _;

		let recorded: RecordedRequests = Default::default();
		let recorded_requests = recorded.clone();

		let capture_route = warp::method()
			.and(warp::path::full())
			.and(warp::query::raw())
			.map(move |method: warp::http::Method, path: warp::path::FullPath, query: String|
			{
				recorded_requests.lock().unwrap()
					.push((method, path.as_str().to_string(), query));
				warp::reply()
			});

		let (address, server) = warp::serve(capture_route).bind_ephemeral(([127, 0, 0, 1], 0));
		tokio::spawn(server);

		let base_url = url::Url::parse(&format!("http://{address}/")).unwrap();
		(base_url, recorded)
	}

	#[tokio::test]
	async fn one_comment_is_posted_per_reference_in_order()
	{
		let (base_url, recorded) = spawn_capture_server();
		let notifier = test_notifier_with(base_url);

		let push = crate::PushEvent
		{
			commits: vec![crate::Commit
			{
				id: "0d1a26e6".to_string(),
				message: "fixes #12 and #34".to_string(),
				url: "https://example.com/commit/0d1a26e6".to_string(),
				committer: crate::User{name: "Monalisa Octocat".to_string(), ..Default::default()},
				..Default::default()
			}],
			..Default::default()
		};

		notifier.notify_push(push).await;

		// Comments are posted sequentially, so both requests have been recorded by now
		let recorded = recorded.lock().unwrap();
		assert_eq!(recorded.len(), 2);
		assert_eq!(recorded[0].0, warp::http::Method::POST);
		assert_eq!(recorded[0].1, "/cards/12/actions/comments");
		assert_eq!(recorded[1].0, warp::http::Method::POST);
		assert_eq!(recorded[1].1, "/cards/34/actions/comments");

		let expected_text = "Monalisa Octocat push the commit 'fixes #12 and #34'[0d1a26e6]\
			(https://example.com/commit/0d1a26e6)";

		for (_, _, query) in recorded.iter()
		{
			let query: Vec<(String, String)> =
				url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
			assert_eq!(query, vec![
				("text".to_string(), expected_text.to_string()),
				("key".to_string(), "key123".to_string()),
				("token".to_string(), "token456".to_string()),
			]);
		}
	}

	#[tokio::test]
	async fn commits_without_references_post_nothing()
	{
		let (base_url, recorded) = spawn_capture_server();
		let notifier = test_notifier_with(base_url);

		let push = crate::PushEvent
		{
			commits: vec![crate::Commit
			{
				message: "fix typo".to_string(),
				..Default::default()
			}],
			..Default::default()
		};

		notifier.notify_push(push).await;

		assert!(recorded.lock().unwrap().is_empty());
	}

	#[test]
	fn references_are_found_in_left_to_right_order()
	{
		let notifier = test_notifier();
		assert_eq!(notifier.card_references("fixes #12 and #34"), vec!["12", "34"]);
	}

	#[test]
	fn message_without_references_yields_nothing()
	{
		let notifier = test_notifier();
		assert!(notifier.card_references("fix typo").is_empty());
		assert!(notifier.card_references("").is_empty());
		// A lone hash with no word characters after it is not a reference
		assert!(notifier.card_references("see issue # 12").is_empty());
	}

	#[test]
	fn duplicate_references_are_kept()
	{
		let notifier = test_notifier();
		assert_eq!(notifier.card_references("#12 again #12"), vec!["12", "12"]);
	}

	#[test]
	fn references_may_contain_letters_digits_and_underscores()
	{
		let notifier = test_notifier();
		assert_eq!(
			notifier.card_references("start #card_A9, stop at punctuation #b2!"),
			vec!["card_A9", "b2"]);
	}

	#[test]
	fn comment_text_matches_template_verbatim()
	{
		let commit = crate::Commit
		{
			id: "0d1a26e6".to_string(),
			message: "fixes #12".to_string(),
			url: "https://example.com/commit/0d1a26e6".to_string(),
			committer: crate::User{name: "Monalisa Octocat".to_string(), ..Default::default()},
			..Default::default()
		};

		assert_eq!(
			comment_text(&commit),
			"Monalisa Octocat push the commit 'fixes #12'[0d1a26e6]\
				(https://example.com/commit/0d1a26e6)");
	}

	#[test]
	fn comment_text_applies_no_escaping()
	{
		let commit = crate::Commit
		{
			id: "ffab12".to_string(),
			message: "weird ['brackets'] & <tags>".to_string(),
			url: "https://example.com/c/ffab12".to_string(),
			committer: crate::User{name: "A & B".to_string(), ..Default::default()},
			..Default::default()
		};

		assert_eq!(
			comment_text(&commit),
			"A & B push the commit 'weird ['brackets'] & <tags>'[ffab12]\
				(https://example.com/c/ffab12)");
	}
}
