//! Command-line client for the REST API.
//!
//! ```text
//! flashcards-client [--addr <base-url>] <command> [args...]
//!
//! createDeck  <title> <description> <author>
//! getDeckById <id>
//! updateDeck  <id> <title> <description> <author>
//! deleteDeck  <id>
//! createCard  <front> <back> <deckId> <author>
//! getCardById <id>
//! updateCard  <id> <front> <back> <deckId> <author>
//! deleteCard  <id>
//! ```

use flashcards_commands::{
    CreateCardRequest, CreateDeckRequest, UpdateCardRequest, UpdateDeckRequest,
};
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Default server address.
pub const DEFAULT_ADDR: &str = "http://localhost:8080";

/// Client failures.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Wrong arguments; nothing was sent.
    #[error("{0}")]
    Usage(String),

    /// Unrecognised command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An argument that must be an integer is not one.
    #[error("invalid {name}: {value:?}")]
    InvalidNumber {
        /// Argument name.
        name: &'static str,
        /// Raw argument.
        value: String,
    },

    /// Transport failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("server returned {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

/// One parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// `createDeck`
    CreateDeck(CreateDeckRequest),
    /// `getDeckById`
    GetDeckById(i64),
    /// `updateDeck`
    UpdateDeck(UpdateDeckRequest),
    /// `deleteDeck`
    DeleteDeck(i64),
    /// `createCard`
    CreateCard(CreateCardRequest),
    /// `getCardById`
    GetCardById(i64),
    /// `updateCard`
    UpdateCard(UpdateCardRequest),
    /// `deleteCard`
    DeleteCard(i64),
}

fn expect_args<'a, const N: usize>(
    command: &str,
    args: &'a [String],
    names: [&str; N],
) -> Result<[&'a str; N], ClientError> {
    if args.len() != N {
        return Err(ClientError::Usage(format!(
            "{command} requires {N} argument{}: {}",
            if N == 1 { "" } else { "s" },
            names.join(", ")
        )));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

fn number(name: &'static str, value: &str) -> Result<i64, ClientError> {
    value.parse().map_err(|_| ClientError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

impl ClientCommand {
    /// Parse a command name and its positional arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for unknown commands, wrong argument counts
    /// and non-integer ids.
    pub fn parse(command: &str, args: &[String]) -> Result<Self, ClientError> {
        match command {
            "createDeck" => {
                let [title, description, author] =
                    expect_args(command, args, ["title", "description", "author"])?;
                Ok(Self::CreateDeck(CreateDeckRequest {
                    title: title.into(),
                    description: description.into(),
                    author: author.into(),
                }))
            },
            "getDeckById" => {
                let [id] = expect_args(command, args, ["id"])?;
                Ok(Self::GetDeckById(number("deck ID", id)?))
            },
            "updateDeck" => {
                let [id, title, description, author] =
                    expect_args(command, args, ["id", "title", "description", "author"])?;
                Ok(Self::UpdateDeck(UpdateDeckRequest {
                    id: number("deck ID", id)?,
                    title: title.into(),
                    description: description.into(),
                    author: author.into(),
                }))
            },
            "deleteDeck" => {
                let [id] = expect_args(command, args, ["id"])?;
                Ok(Self::DeleteDeck(number("deck ID", id)?))
            },
            "createCard" => {
                let [front, back, deck_id, author] =
                    expect_args(command, args, ["front", "back", "deckId", "author"])?;
                Ok(Self::CreateCard(CreateCardRequest {
                    front: front.into(),
                    back: back.into(),
                    deck_id: number("deck ID", deck_id)?,
                    author: author.into(),
                }))
            },
            "getCardById" => {
                let [id] = expect_args(command, args, ["id"])?;
                Ok(Self::GetCardById(number("card ID", id)?))
            },
            "updateCard" => {
                let [id, front, back, deck_id, author] =
                    expect_args(command, args, ["id", "front", "back", "deckId", "author"])?;
                Ok(Self::UpdateCard(UpdateCardRequest {
                    id: number("card ID", id)?,
                    front: front.into(),
                    back: back.into(),
                    deck_id: number("deck ID", deck_id)?,
                    author: author.into(),
                }))
            },
            "deleteCard" => {
                let [id] = expect_args(command, args, ["id"])?;
                Ok(Self::DeleteCard(number("card ID", id)?))
            },
            other => Err(ClientError::UnknownCommand(other.to_string())),
        }
    }

    /// HTTP method of the REST route.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::CreateDeck(_) | Self::CreateCard(_) => Method::POST,
            Self::GetDeckById(_) | Self::GetCardById(_) => Method::GET,
            Self::UpdateDeck(_) | Self::UpdateCard(_) => Method::PUT,
            Self::DeleteDeck(_) | Self::DeleteCard(_) => Method::DELETE,
        }
    }

    /// Path of the REST route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::CreateDeck(_) => "/v1/decks".to_string(),
            Self::GetDeckById(id) | Self::DeleteDeck(id) => format!("/v1/decks/{id}"),
            Self::UpdateDeck(request) => format!("/v1/decks/{}", request.id),
            Self::CreateCard(_) => "/v1/cards".to_string(),
            Self::GetCardById(id) | Self::DeleteCard(id) => format!("/v1/cards/{id}"),
            Self::UpdateCard(request) => format!("/v1/cards/{}", request.id),
        }
    }

    /// JSON body, for the commands that send one.
    #[must_use]
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::CreateDeck(request) => serde_json::to_value(request).ok(),
            Self::UpdateDeck(request) => serde_json::to_value(request).ok(),
            Self::CreateCard(request) => serde_json::to_value(request).ok(),
            Self::UpdateCard(request) => serde_json::to_value(request).ok(),
            Self::GetDeckById(_) | Self::DeleteDeck(_) | Self::GetCardById(_) | Self::DeleteCard(_) => None,
        }
    }
}

/// HTTP client for the flashcards REST API.
#[derive(Debug, Clone)]
pub struct FlashcardsClient {
    http: reqwest::Client,
    base_url: String,
}

impl FlashcardsClient {
    /// Client talking to `base_url` (e.g. `http://localhost:8080`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send one command and return the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] on transport failure and
    /// [`ClientError::Server`] on a non-success status.
    pub async fn execute(&self, command: &ClientCommand) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, command.path());
        let mut request = self.http.request(command.method(), &url);
        if let Some(body) = command.body() {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}
