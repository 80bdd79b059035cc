//! Commit object
//!
//! Commits link a tree snapshot into the history chain. They contain:
//! - A tree object ID (directory snapshot)
//! - At most one parent commit ID (none for the root commit)
//! - Author and committer information (identical in this model)
//! - Commit message
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//!
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

/// Identity used when neither an explicit author nor the environment names one
pub const DEFAULT_AUTHOR_NAME: &str = "twig";
pub const DEFAULT_AUTHOR_EMAIL: &str = "twig@localhost";

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the local time and its UTC offset
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Resolve the commit identity
    ///
    /// An explicit `"Name <email>"` wins; otherwise `GIT_AUTHOR_NAME` and
    /// `GIT_AUTHOR_EMAIL` are used when both are set, falling back to the
    /// built-in identity. `GIT_AUTHOR_DATE` overrides the timestamp.
    pub fn resolve(explicit: Option<&str>) -> anyhow::Result<Self> {
        let (name, email) = match explicit {
            Some(identity) => Self::parse_identity(identity)?,
            None => match (std::env::var("GIT_AUTHOR_NAME"), std::env::var("GIT_AUTHOR_EMAIL")) {
                (Ok(name), Ok(email)) => (name, email),
                _ => (
                    DEFAULT_AUTHOR_NAME.to_string(),
                    DEFAULT_AUTHOR_EMAIL.to_string(),
                ),
            },
        };

        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    /// Split `"Name <email>"` into its parts
    pub fn parse_identity(identity: &str) -> anyhow::Result<(String, String)> {
        let email_start = identity
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<' in {identity:?}"))?;
        let email_end = identity
            .rfind('>')
            .filter(|end| *end > email_start)
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>' in {identity:?}"))?;

        let name = identity[..email_start].trim().to_string();
        let email = identity[email_start + 1..email_end].trim().to_string();

        if name.is_empty() || email.is_empty() {
            anyhow::bail!("Invalid author format: expected \"Name <email>\", got {identity:?}");
        }

        Ok((name, email))
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> <epoch> <±HHMM>"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Format timestamp in human-readable form, like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let offset = parse_utc_offset(parts[0])?;
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let (name, email) = Self::parse_identity(parts[2])?;

        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Parse a `±HHMM` offset
fn parse_utc_offset(text: &str) -> anyhow::Result<FixedOffset> {
    let (sign, digits) = match text.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => anyhow::bail!("Invalid timezone {text:?}"),
    };
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("Invalid timezone {text:?}");
    }

    let hours: i32 = digits[..2].parse()?;
    let minutes: i32 = digits[2..].parse()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow::anyhow!("Invalid timezone {text:?}"))
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Previous head of the branch; `None` for the root commit
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit; the author doubles as committer
    pub fn new(parent: Option<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.display()))
    }
}

impl Unpackable for Commit {
    fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        let content = String::from_utf8(bytes.to_vec()).context("Invalid commit object: not UTF-8")?;
        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing blank line before message")?;
        let message = message.strip_suffix('\n').unwrap_or(message).to_string();

        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                let parent_oid = ObjectId::try_parse(parent_oid.to_string())?;
                next_line = lines
                    .next()
                    .context("Invalid commit object: missing author line")?;
                Some(parent_oid)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .context("Invalid commit object: missing committer line")?;
        let committer = Author::try_from(committer)?;

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> Author {
        let timestamp = DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z")
            .unwrap();
        Author::new_with_timestamp("A U Thor".to_string(), "author@example.com".to_string(), timestamp)
    }

    #[rstest]
    fn test_root_commit_layout(author: Author) {
        let tree = ObjectId::digest(b"tree");
        let commit = Commit::new(None, tree.clone(), author, "Initial commit".to_string());

        let expected = format!(
            "tree {tree}\n\
             author A U Thor <author@example.com> 1672567200 +0200\n\
             committer A U Thor <author@example.com> 1672567200 +0200\n\
             \n\
             Initial commit\n"
        );
        assert_eq!(commit.serialize().unwrap(), Bytes::from(expected));
    }

    #[rstest]
    fn test_commit_with_parent_decodes(author: Author) {
        let parent = ObjectId::digest(b"parent");
        let commit = Commit::new(
            Some(parent.clone()),
            ObjectId::digest(b"tree"),
            author,
            "Second commit\n\nWith a body".to_string(),
        );

        let payload = commit.serialize().unwrap();
        assert!(String::from_utf8_lossy(&payload).contains(&format!("\nparent {parent}\n")));

        let decoded = Commit::deserialize(payload).unwrap();
        assert_eq!(decoded, commit);
        assert_eq!(decoded.message(), "Second commit\n\nWith a body");
    }

    #[rstest]
    #[case("A U Thor <author@example.com>", "A U Thor", "author@example.com")]
    #[case("  solo<solo@host>  ", "solo", "solo@host")]
    fn test_parse_identity(#[case] identity: &str, #[case] name: &str, #[case] email: &str) {
        assert_eq!(
            Author::parse_identity(identity).unwrap(),
            (name.to_string(), email.to_string())
        );
    }

    #[rstest]
    #[case("no email")]
    #[case("<only@email>")]
    #[case("Name <>")]
    fn test_reject_malformed_identity(#[case] identity: &str) {
        assert!(Author::parse_identity(identity).is_err());
    }

    #[rstest]
    #[case("+0000", 0)]
    #[case("-0130", -5400)]
    #[case("+0545", 20700)]
    fn test_parse_utc_offset(#[case] text: &str, #[case] seconds: i32) {
        assert_eq!(parse_utc_offset(text).unwrap().local_minus_utc(), seconds);
    }
}
