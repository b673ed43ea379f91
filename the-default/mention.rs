//! `@user` mentions backed by a remote user directory.
//!
//! Lookups are debounced: every query replaces the pending one and only the
//! last query of a burst reaches the directory. A new query also cancels a
//! lookup that is still in flight, so its answer never arrives.

use std::{
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use eyre::{
  Result,
  WrapErr,
  eyre,
};
use serde::{
  Deserialize,
  Serialize,
};
use the_event::{
  AsyncHook,
  TaskController,
  cancelable_future,
  send_blocking,
};
use the_lib::{
  provider::{
    Suggestion,
    SuggestionCallback,
    SuggestionProvider,
  },
  trigger::{
    self,
    Trigger,
  },
};
use tokio::{
  sync::mpsc::Sender,
  time::Instant,
};
use url::Url;

pub const MENTION_TRIGGER: &str = r"(?:^|\s)(?P<token>@(?P<query>[\w.\-]+))$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       u64,
  pub username: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
  /// Users whose name starts with `term`, excluding the current user.
  async fn search(&self, term: &str) -> Result<Vec<User>>;
}

/// Directory served over HTTP as `GET {endpoint}/users?s=<term>&self=no&prefix=yes`.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
  client:   reqwest::Client,
  endpoint: Url,
}

impl HttpUserDirectory {
  pub fn new(endpoint: &str) -> Result<Self> {
    let endpoint =
      Url::parse(endpoint).wrap_err_with(|| format!("invalid mention endpoint '{endpoint}'"))?;
    if endpoint.cannot_be_a_base() {
      return Err(eyre!("mention endpoint '{endpoint}' cannot be used as a base URL"));
    }
    Ok(Self {
      client: reqwest::Client::new(),
      endpoint,
    })
  }

  pub fn users_url(&self) -> Result<Url> {
    let mut url = self.endpoint.clone();
    url
      .path_segments_mut()
      .map_err(|_| eyre!("mention endpoint cannot be a base"))?
      .pop_if_empty()
      .push("users");
    Ok(url)
  }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
  async fn search(&self, term: &str) -> Result<Vec<User>> {
    let url = self.users_url()?;
    let users = self
      .client
      .get(url)
      .query(&[("s", term), ("self", "no"), ("prefix", "yes")])
      .send()
      .await
      .wrap_err("user directory request failed")?
      .error_for_status()
      .wrap_err("user directory returned an error")?
      .json::<Vec<User>>()
      .await
      .wrap_err("failed to decode user directory response")?;
    Ok(users)
  }
}

pub struct MentionRequest {
  term:  String,
  reply: SuggestionCallback,
}

pub struct MentionHook {
  directory:  Arc<dyn UserDirectory>,
  debounce:   Duration,
  pending:    Option<MentionRequest>,
  controller: TaskController,
}

impl MentionHook {
  pub fn new(directory: Arc<dyn UserDirectory>, debounce: Duration) -> Self {
    Self {
      directory,
      debounce,
      pending: None,
      controller: TaskController::new(),
    }
  }
}

impl AsyncHook for MentionHook {
  type Event = MentionRequest;

  fn handle_event(&mut self, event: MentionRequest, _timeout: Option<Instant>) -> Option<Instant> {
    // the replaced request is never answered
    self.pending = Some(event);
    self.controller.cancel();
    Some(Instant::now() + self.debounce)
  }

  fn finish_debounce(&mut self) {
    let Some(MentionRequest { term, reply }) = self.pending.take() else {
      return;
    };
    let handle = self.controller.restart();
    let directory = self.directory.clone();

    tokio::spawn(async move {
      let users = match cancelable_future(directory.search(&term), handle).await {
        Some(Ok(users)) => users,
        Some(Err(err)) => {
          tracing::warn!("mention lookup for '{term}' failed: {err:#}");
          Vec::new()
        },
        None => {
          tracing::trace!("mention lookup for '{term}' was superseded");
          return;
        },
      };
      let items = users
        .into_iter()
        .map(|user| {
          let mention = format!("@{}", user.username);
          Suggestion::new(user.username, mention)
        })
        .collect();
      reply(items);
    });
  }
}

/// Requests are handed to a [`MentionHook`] running on the current tokio
/// runtime; without one, queries go unanswered.
pub struct MentionProvider {
  trigger: Trigger,
  tx:      Sender<MentionRequest>,
}

impl MentionProvider {
  pub fn new(directory: Arc<dyn UserDirectory>, debounce: Duration) -> trigger::Result<Self> {
    Ok(Self {
      trigger: Trigger::new(MENTION_TRIGGER)?,
      tx:      MentionHook::new(directory, debounce).spawn(),
    })
  }
}

impl SuggestionProvider for MentionProvider {
  fn name(&self) -> &str {
    "mentions"
  }

  fn trigger(&self) -> &Trigger {
    &self.trigger
  }

  fn suggestions(&self, query: &str, reply: SuggestionCallback) {
    send_blocking(&self.tx, MentionRequest {
      term: query.to_string(),
      reply,
    });
  }

  fn render(&self, suggestion: &Suggestion) -> String {
    suggestion.value.clone()
  }
}
