//!
//! # Trigger expressions
//!
//! Trigger expressions address the items they evaluate through item queries written as the first
//! parameter of a history function: `last(/Linux by agent/system.cpu.load[all,avg1])>5`.
//!
//! This crate only understands the parts the inheritance engine cares about:
//! - which owners (hosts or templates) an expression references;
//! - which item keys it references;
//! - rewriting every owner reference when a trigger is copied onto another owner;
//! - an owner independent normalized form, used to match copies of the same trigger.
//!
//! ```
//! use lineage_expression::Expression;
//!
//! let expression: Expression = "last(/Template OS/system.cpu.load[all,avg1])>5".parse().unwrap();
//! assert_eq!(expression.hosts().into_iter().collect::<Vec<_>>(), vec!["Template OS"]);
//!
//! let on_host = expression.rebind("web-01");
//! assert_eq!(on_host.as_str(), "last(/web-01/system.cpu.load[all,avg1])>5");
//! assert_eq!(on_host.normalized(), expression.normalized());
//! ```

#![warn(
	clippy::all,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	deprecated
)]

use std::{collections::BTreeSet, fmt, ops::Range, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder written in place of every owner reference by [`Expression::normalized`].
pub const HOST_PLACEHOLDER: &str = "{HOST}";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
	#[error("empty expression")]
	Empty,
	#[error("unterminated string literal starting at position {0}")]
	UnterminatedString(usize),
	#[error("item query at position {0} is missing the host part")]
	EmptyHost(usize),
	#[error("item query at position {0} is missing the item key")]
	EmptyKey(usize),
	#[error("item query at position {0} is not terminated")]
	UnterminatedQuery(usize),
	#[error("unbalanced bracket in item key at position {0}")]
	UnbalancedBracket(usize),
}

/// A single `/host/key` reference found inside an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemQuery {
	host: String,
	key: String,
	host_span: Range<usize>,
}

impl ItemQuery {
	#[must_use]
	pub fn host(&self) -> &str {
		&self.host
	}

	#[must_use]
	pub fn key(&self) -> &str {
		&self.key
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Expression {
	source: String,
	queries: Vec<ItemQuery>,
}

impl Expression {
	/// Parses an expression, collecting every item query found in it.
	pub fn parse(source: impl Into<String>) -> Result<Self, ExpressionError> {
		let source = source.into();

		if source.trim().is_empty() {
			return Err(ExpressionError::Empty);
		}

		let queries = scan_queries(&source)?;

		Ok(Self { source, queries })
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.source
	}

	#[must_use]
	pub fn queries(&self) -> &[ItemQuery] {
		&self.queries
	}

	/// Distinct owner names referenced by the expression.
	#[must_use]
	pub fn hosts(&self) -> BTreeSet<&str> {
		self.queries.iter().map(ItemQuery::host).collect()
	}

	/// Distinct item keys referenced by the expression.
	#[must_use]
	pub fn keys(&self) -> BTreeSet<&str> {
		self.queries.iter().map(ItemQuery::key).collect()
	}

	#[must_use]
	pub fn references_host(&self, host: &str) -> bool {
		self.queries.iter().any(|query| query.host == host)
	}

	/// Rewrites every owner reference to `host`.
	///
	/// Owner names never contain `/`, so the rewritten expression keeps the same query layout.
	#[must_use]
	pub fn rebind(&self, host: &str) -> Self {
		self.rebind_with(|_| host.to_string())
	}

	/// Rewrites every owner reference with the name returned by `rename`.
	#[must_use]
	pub fn rebind_with(&self, mut rename: impl FnMut(&str) -> String) -> Self {
		let mut source = String::with_capacity(self.source.len());
		let mut queries = Vec::with_capacity(self.queries.len());
		let mut cursor = 0;

		for query in &self.queries {
			source.push_str(&self.source[cursor..query.host_span.start]);

			let host = rename(&query.host);
			let start = source.len();
			source.push_str(&host);

			queries.push(ItemQuery {
				host,
				key: query.key.clone(),
				host_span: start..source.len(),
			});

			cursor = query.host_span.end;
		}

		source.push_str(&self.source[cursor..]);

		Self { source, queries }
	}

	/// Owner independent form of the expression, every host replaced by [`HOST_PLACEHOLDER`].
	#[must_use]
	pub fn normalized(&self) -> String {
		self.rebind(HOST_PLACEHOLDER).source
	}
}

impl fmt::Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

impl FromStr for Expression {
	type Err = ExpressionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for Expression {
	type Error = ExpressionError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl From<Expression> for String {
	fn from(expression: Expression) -> Self {
		expression.source
	}
}

fn scan_queries(source: &str) -> Result<Vec<ItemQuery>, ExpressionError> {
	let bytes = source.as_bytes();
	let mut queries = Vec::new();
	let mut i = 0;

	while i < bytes.len() {
		match bytes[i] {
			b'"' => i = skip_string(bytes, i)?,
			b'(' => {
				let mut j = i + 1;
				while j < bytes.len() && bytes[j].is_ascii_whitespace() {
					j += 1;
				}

				if j < bytes.len() && bytes[j] == b'/' {
					let (query, end) = parse_query(source, j)?;
					queries.push(query);
					i = end;
				} else {
					i += 1;
				}
			}
			_ => i += 1,
		}
	}

	Ok(queries)
}

/// Returns the index right after the closing quote of the string starting at `start`.
fn skip_string(bytes: &[u8], start: usize) -> Result<usize, ExpressionError> {
	let mut i = start + 1;

	while i < bytes.len() {
		match bytes[i] {
			b'\\' => i += 2,
			b'"' => return Ok(i + 1),
			_ => i += 1,
		}
	}

	Err(ExpressionError::UnterminatedString(start))
}

/// Parses `/host/key` starting at the leading slash, returning the query and the index where the
/// key ends.
fn parse_query(source: &str, start: usize) -> Result<(ItemQuery, usize), ExpressionError> {
	let bytes = source.as_bytes();
	let host_start = start + 1;
	let mut i = host_start;

	while i < bytes.len() && bytes[i] != b'/' {
		if matches!(bytes[i], b',' | b')') {
			return Err(ExpressionError::EmptyKey(start));
		}
		i += 1;
	}

	if i >= bytes.len() {
		return Err(ExpressionError::UnterminatedQuery(start));
	}

	if i == host_start {
		return Err(ExpressionError::EmptyHost(start));
	}

	let host_span = host_start..i;
	let key_start = i + 1;
	let mut depth = 0_usize;
	let mut k = key_start;

	loop {
		let Some(&byte) = bytes.get(k) else {
			return Err(ExpressionError::UnterminatedQuery(start));
		};

		match byte {
			b'"' if depth > 0 => {
				k = skip_string(bytes, k)?;
				continue;
			}
			b'[' => depth += 1,
			b']' => {
				if depth == 0 {
					return Err(ExpressionError::UnbalancedBracket(k));
				}
				depth -= 1;
			}
			b',' | b')' if depth == 0 => break,
			// Item filters of aggregate functions: /host/key?[tag="x"]
			b'?' if depth == 0 && bytes.get(k + 1) == Some(&b'[') => break,
			_ => {}
		}

		k += 1;
	}

	if k == key_start {
		return Err(ExpressionError::EmptyKey(start));
	}

	Ok((
		ItemQuery {
			host: source[host_span.clone()].to_string(),
			key: source[key_start..k].to_string(),
			host_span,
		},
		k,
	))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_single_query() {
		let expression = Expression::parse("last(/Template OS/system.cpu.load)>5").unwrap();

		assert_eq!(expression.queries().len(), 1);
		assert_eq!(expression.queries()[0].host(), "Template OS");
		assert_eq!(expression.queries()[0].key(), "system.cpu.load");
	}

	#[test]
	fn test_key_with_parameters() {
		let expression =
			Expression::parse(r#"avg(/T/vfs.fs.size["/var,log",pfree],5m)<10"#).unwrap();

		assert_eq!(
			expression.keys().into_iter().collect::<Vec<_>>(),
			vec![r#"vfs.fs.size["/var,log",pfree]"#]
		);
	}

	#[test]
	fn test_multiple_hosts() {
		let expression =
			Expression::parse("last(/A/net.in)>0 and last(/B/net.out)>0 or last(/A/net.out)=1")
				.unwrap();

		assert_eq!(
			expression.hosts().into_iter().collect::<Vec<_>>(),
			vec!["A", "B"]
		);
		assert_eq!(expression.keys().len(), 2);
		assert!(expression.references_host("B"));
		assert!(!expression.references_host("C"));
	}

	#[test]
	fn test_string_literals_are_skipped() {
		let expression =
			Expression::parse(r#"find(/H/log,,"like","(/not/a/query)")=1"#).unwrap();

		assert_eq!(expression.queries().len(), 1);
		assert_eq!(expression.queries()[0].key(), "log");
	}

	#[test]
	fn test_rebind_rewrites_every_host() {
		let expression =
			Expression::parse("last(/A/net.in)>0 and last(/B/net.out)>0").unwrap();

		let rebound = expression.rebind("web-01");

		assert_eq!(
			rebound.as_str(),
			"last(/web-01/net.in)>0 and last(/web-01/net.out)>0"
		);
		assert_eq!(
			rebound.hosts().into_iter().collect::<Vec<_>>(),
			vec!["web-01"]
		);

		// Spans must still point at the right place after a length change
		let again = rebound.rebind("x");
		assert_eq!(again.as_str(), "last(/x/net.in)>0 and last(/x/net.out)>0");
	}

	#[test]
	fn test_normalized_is_owner_independent() {
		let on_template = Expression::parse("last(/Template OS/agent.ping)=0").unwrap();
		let on_host = Expression::parse("last(/db-02/agent.ping)=0").unwrap();

		assert_eq!(on_template.normalized(), on_host.normalized());
		assert_eq!(on_host.normalized(), "last(/{HOST}/agent.ping)=0");
	}

	#[test]
	fn test_item_filter_ends_key() {
		let expression = Expression::parse(r#"count(/*/net.if.in?[group="Linux"])>1"#).unwrap();

		assert_eq!(expression.queries()[0].key(), "net.if.in");
	}

	#[test]
	fn test_errors() {
		assert_eq!(Expression::parse("  "), Err(ExpressionError::Empty));
		assert!(matches!(
			Expression::parse("last(//key)"),
			Err(ExpressionError::EmptyHost(_))
		));
		assert!(matches!(
			Expression::parse("last(/host/)"),
			Err(ExpressionError::EmptyKey(_))
		));
		assert!(matches!(
			Expression::parse("last(/host/key[a"),
			Err(ExpressionError::UnterminatedQuery(_))
		));
		assert!(matches!(
			Expression::parse("last(/host/key])"),
			Err(ExpressionError::UnbalancedBracket(_))
		));
		assert!(matches!(
			Expression::parse(r#"last(/h/k)="abc"#),
			Err(ExpressionError::UnterminatedString(_))
		));
	}

	#[test]
	fn test_serde_as_string() {
		let expression = Expression::parse("last(/T/k)>1").unwrap();
		let json = serde_json::to_string(&expression).unwrap();

		assert_eq!(json, r#""last(/T/k)>1""#);
		assert_eq!(
			serde_json::from_str::<Expression>(&json).unwrap(),
			expression
		);
		assert!(serde_json::from_str::<Expression>(r#""last(//k)""#).is_err());
	}
}
