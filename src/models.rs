//! Data model for the push webhook payload.
//!
//! Every entity here is a transient, request-scoped value: constructed fresh while decoding one
//! inbound request, never mutated afterwards, and discarded once the batch has been processed.
//! All fields carry serde defaults so that a payload with missing fields still decodes, with the
//! absent values reading as empty/zero.

/// A person attached to a commit (author, committer, or pusher).
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User
{
	/// The person’s display name.
	#[serde(default)]
	pub name: String,
	/// The person’s e-mail address.
	#[serde(default)]
	pub email: String,
	/// The person’s account handle.
	#[serde(default)]
	pub username: String,
}

/// Descriptive metadata about the repository that was pushed to.
///
/// Carried through decoding for potential future use; none of these fields are read when
/// producing the outbound comment.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Repository
{
	#[serde(default)]
	pub id: i64,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub homepage: String,
	#[serde(default)]
	pub watchers: i64,
	#[serde(default)]
	pub stargazers: i64,
	#[serde(default)]
	pub forks: i64,
	#[serde(default)]
	pub fork: bool,
	#[serde(default)]
	pub size: i64,
	#[serde(default)]
	pub owner: User,
	#[serde(default)]
	pub private: bool,
	#[serde(default)]
	pub open_issues: i64,
	#[serde(default)]
	pub has_issues: bool,
	#[serde(default)]
	pub has_downloads: bool,
	#[serde(default)]
	pub has_wiki: bool,
	#[serde(default)]
	pub language: String,
	#[serde(default)]
	pub created_at: i64,
	#[serde(default)]
	pub pushed_at: i64,
	#[serde(default)]
	pub master_branch: String,
	#[serde(default)]
	pub organization: String,
}

/// A single commit as reported in the push payload.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Commit
{
	/// The commit hash.
	#[serde(default)]
	pub id: String,
	/// Whether this commit is distinct from any previously pushed commit.
	#[serde(default)]
	pub distinct: bool,
	/// The free-text commit message. This is the only field the card-reference scan looks at.
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub timestamp: String,
	/// User-facing URL of the commit.
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub author: User,
	#[serde(default)]
	pub committer: User,
	#[serde(default)]
	pub pusher: User,
	/// Paths of files added, removed, and modified by this commit.
	#[serde(default)]
	pub added: Vec<String>,
	#[serde(default)]
	pub removed: Vec<String>,
	#[serde(default)]
	pub modified: Vec<String>,
	/// The repository this commit belongs to.
	#[serde(default)]
	pub repository: Repository,
}

/// The decoded representation of a push webhook notification, containing zero or more commits.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PushEvent
{
	/// The full name of the pushed ref (for example `refs/heads/master`).
	#[serde(default)]
	#[serde(rename = "ref")]
	pub reference: String,
	/// The revision the ref pointed to before the push.
	#[serde(default)]
	pub before: String,
	/// The revision the ref points to after the push.
	#[serde(default)]
	pub after: String,
	#[serde(default)]
	pub created: bool,
	#[serde(default)]
	pub deleted: bool,
	#[serde(default)]
	pub forced: bool,
	/// URL comparing the before and after revisions.
	#[serde(default)]
	pub compare: String,
	/// The pushed commits, in the order supplied by the sender. No reordering is performed.
	#[serde(default)]
	pub commits: Vec<Commit>,
}
