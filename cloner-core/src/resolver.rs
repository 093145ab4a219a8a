//! Dialog resolver: turns an operator selector (listing index, username or numeric id) into a
//! [`Conversation`].

use tracing::{info, instrument};

use crate::client::ChatClient;
use crate::error::{CloneError, Result};
use crate::prompt::Prompter;
use crate::types::Conversation;

/// Parsed operator input for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based position in the dialog listing.
    Index(usize),
    Id(i64),
    Username(String),
}

/// Result of interpreting a line typed at the dialog prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingChoice {
    Selected(Selector),
    /// Positive number that cannot be a platform id but is not in the listing either.
    OutOfRange(u64),
    /// Blank input.
    Cancelled,
}

impl Selector {
    /// Parses a selector given without a listing (env or CLI): numbers are ids, the rest usernames.
    pub fn parse_direct(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Some(match input.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Username(input.trim_start_matches('@').to_string()),
        })
    }

    /// Interprets input typed against a listing of `listed` dialogs capped at `limit`.
    ///
    /// Digits in `1..=listed` pick from the listing. Digits up to `limit` that are out of range
    /// are rejected so the operator can retry; larger numbers and signed numbers are raw ids.
    pub fn parse_listing(input: &str, listed: usize, limit: usize) -> ListingChoice {
        let input = input.trim();
        if input.is_empty() {
            return ListingChoice::Cancelled;
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            match input.parse::<u64>() {
                Ok(n) if n >= 1 && n <= listed as u64 => {
                    return ListingChoice::Selected(Self::Index(n as usize))
                }
                Ok(n) if n <= limit.max(listed) as u64 => return ListingChoice::OutOfRange(n),
                _ => {}
            }
        }
        match Self::parse_direct(input) {
            Some(selector) => ListingChoice::Selected(selector),
            None => ListingChoice::Cancelled,
        }
    }
}

/// Resolves `selector` against the cached `listing` or the backend.
///
/// Backend failures (unknown entity, no access) become [`CloneError::Resolution`].
pub async fn resolve_selector<C: ChatClient>(
    client: &C,
    listing: &[Conversation],
    selector: &Selector,
) -> Result<Conversation> {
    let resolved = match selector {
        Selector::Index(index) => {
            return listing
                .get(index.saturating_sub(1))
                .cloned()
                .ok_or_else(|| {
                    CloneError::Config(format!(
                        "dialog index {} is outside the listing of {}",
                        index,
                        listing.len()
                    ))
                })
        }
        Selector::Id(id) => client.resolve_id(*id).await,
        Selector::Username(name) => client.resolve_username(name).await,
    };
    resolved.map_err(|source| CloneError::Resolution {
        selector: describe(selector),
        source,
    })
}

fn describe(selector: &Selector) -> String {
    match selector {
        Selector::Index(i) => format!("#{}", i),
        Selector::Id(id) => id.to_string(),
        Selector::Username(name) => format!("@{}", name),
    }
}

/// Lists recent dialogs and asks the operator to pick one (`label` says which endpoint).
///
/// Out-of-range indexes re-prompt; blank input returns `Ok(None)`.
#[instrument(skip(client, prompter))]
pub async fn choose_conversation<C: ChatClient>(
    client: &C,
    prompter: &dyn Prompter,
    label: &str,
    limit: usize,
) -> Result<Option<Conversation>> {
    let listing = client
        .recent_dialogs(limit)
        .await
        .map_err(|source| CloneError::Resolution {
            selector: "dialog list".to_string(),
            source,
        })?;

    prompter.say("");
    prompter.say(&format!(
        "{}: pick a number or type a @username or ID.",
        label
    ));
    for (i, conv) in listing.iter().enumerate() {
        prompter.say(&conv.listing_line(i + 1));
    }

    loop {
        let input = prompter.ask("Number or @username/ID").await?;
        match Selector::parse_listing(&input, listing.len(), limit) {
            ListingChoice::Cancelled => return Ok(None),
            ListingChoice::OutOfRange(n) => {
                prompter.say(&format!(
                    "Index {} is out of range (1-{}).",
                    n,
                    listing.len()
                ));
            }
            ListingChoice::Selected(selector) => {
                let conv = resolve_selector(client, &listing, &selector).await?;
                info!(chat_id = conv.id, name = %conv.display_name(), "{} resolved", label);
                return Ok(Some(conv));
            }
        }
    }
}

/// Resolves a selector given up front (env or CLI), without a listing.
pub async fn resolve_direct<C: ChatClient>(
    client: &C,
    input: &str,
) -> Result<Option<Conversation>> {
    match Selector::parse_direct(input) {
        Some(selector) => resolve_selector(client, &[], &selector).await.map(Some),
        None => Ok(None),
    }
}
